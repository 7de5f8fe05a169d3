// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{text_input, text_output};
use crate::config::{Attribute, ConfigurationModel, Schema};
use crate::data::Data;
use crate::modules::{Declaration, GeneratorArgs, Module, ModuleDefinition};

pub const TYPE_ID: &str = "prefix_suffix_adder";

pub fn module() -> Module {
    Module::new(
        Declaration::new(TYPE_ID, "Wraps a text between a prefix and a suffix").with_tags(&["text", "transform"]),
        |_| ModuleDefinition {
            configuration: ConfigurationModel::new([
                ("prefix", Schema::from(Attribute::text("["))),
                ("suffix", Schema::from(Attribute::text("]"))),
            ]),
            inputs: text_input(),
            outputs: Box::new(|args: GeneratorArgs| {
                text_output(args, |text, configuration, _| {
                    let prefix = configuration.get("prefix").and_then(Data::as_str).unwrap_or_default();
                    let suffix = configuration.get("suffix").and_then(Data::as_str).unwrap_or_default();
                    Some(Data::from(format!("{}{}{}", prefix, text, suffix)))
                })
            }),
        },
    )
}
