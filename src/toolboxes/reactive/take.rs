// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{forwarded, free_input, non_negative, single_output};
use crate::config::consts::DEFAULT_INPUT_SLOT;
use crate::config::{Attribute, ConfigurationModel, Schema};
use crate::modules::{Declaration, GeneratorArgs, Module, ModuleDefinition};

pub const TYPE_ID: &str = "take";

pub fn module() -> Module {
    Module::new(
        Declaration::new(TYPE_ID, "Forwards the first `count` messages, then completes")
            .with_tags(&["reactive", "filter"]),
        |_| ModuleDefinition {
            configuration: ConfigurationModel::new([("count", Schema::from(Attribute::integer(1).with_min(0)))]),
            inputs: vec![free_input(DEFAULT_INPUT_SLOT, "the stream to cut")],
            outputs: Box::new(|args: GeneratorArgs| {
                let count = non_negative(&args.configuration, "count") as usize;
                single_output(args.input(DEFAULT_INPUT_SLOT).take(count).map(forwarded))
            }),
        },
    )
}
