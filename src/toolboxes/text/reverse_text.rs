// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{text_input, text_output};
use crate::config::ConfigurationModel;
use crate::data::Data;
use crate::modules::{Declaration, GeneratorArgs, Module, ModuleDefinition};

pub const TYPE_ID: &str = "reverse_text";

pub fn reverse(input: &str) -> String {
    input.chars().rev().collect()
}

pub fn module() -> Module {
    Module::new(
        Declaration::new(TYPE_ID, "Reverses the characters of a text").with_tags(&["text", "transform"]),
        |_| ModuleDefinition {
            configuration: ConfigurationModel::empty(),
            inputs: text_input(),
            outputs: Box::new(|args: GeneratorArgs| text_output(args, |text, _, _| Some(Data::from(reverse(text))))),
        },
    )
}
