// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::single_output;
use crate::config::{Attribute, ConfigurationModel, Schema};
use crate::data::Data;
use crate::modules::{Declaration, GeneratorArgs, Module, ModuleDefinition, OutputMessage};
use crate::streams::Observable;

pub const TYPE_ID: &str = "of";

pub fn module() -> Module {
    Module::new(
        Declaration::new(TYPE_ID, "Emits its configured value once, then completes")
            .with_tags(&["reactive", "producer"]),
        |_| ModuleDefinition {
            configuration: ConfigurationModel::new([("value", Schema::from(Attribute::any(42)))]),
            inputs: vec![],
            outputs: Box::new(|args: GeneratorArgs| {
                let value = args.configuration.get("value").cloned().unwrap_or_default();
                single_output(Observable::from_iter([OutputMessage {
                    data: value,
                    context: args.context,
                }]))
            }),
        },
    )
}
