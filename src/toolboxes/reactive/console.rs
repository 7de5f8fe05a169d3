// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{forwarded, free_input, single_output};
use crate::config::consts::DEFAULT_INPUT_SLOT;
use crate::config::{Attribute, ConfigurationModel, Schema};
use crate::data::Data;
use crate::modules::{Declaration, GeneratorArgs, Module, ModuleDefinition, ProcessingMessage};
use crate::observability::messages::toolbox::ConsoleEcho;
use crate::observability::messages::StructuredLog;

pub const TYPE_ID: &str = "console";

pub fn module() -> Module {
    Module::new(
        Declaration::new(TYPE_ID, "Logs every message and forwards it unchanged").with_tags(&["reactive", "sink"]),
        |_| ModuleDefinition {
            configuration: ConfigurationModel::new([("prefix", Schema::from(Attribute::text("console")))]),
            inputs: vec![free_input(DEFAULT_INPUT_SLOT, "anything to log")],
            outputs: Box::new(|args: GeneratorArgs| {
                let echoed = args.input(DEFAULT_INPUT_SLOT).map(|message: &ProcessingMessage| {
                    let prefix = message.configuration.get("prefix").and_then(Data::as_str).unwrap_or_default();
                    ConsoleEcho {
                        prefix,
                        data: &message.data,
                    }
                    .log();
                    message.context.info(prefix, message.data.clone());
                    forwarded(message)
                });
                single_output(echoed)
            }),
        },
    )
}
