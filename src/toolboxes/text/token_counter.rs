// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{text_input, text_output};
use crate::config::ConfigurationModel;
use crate::data::Data;
use crate::modules::{Declaration, GeneratorArgs, Module, ModuleDefinition};

pub const TYPE_ID: &str = "token_counter";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCount {
    pub char_count: usize,
    pub word_count: usize,
    pub line_count: usize,
}

pub fn count_tokens(input: &str) -> TokenCount {
    TokenCount {
        char_count: input.chars().count(),
        word_count: input.split_whitespace().count(),
        // at least one line, even when empty
        line_count: input.lines().count().max(1),
    }
}

impl From<TokenCount> for Data {
    fn from(count: TokenCount) -> Self {
        Data::record([
            ("char_count", count.char_count),
            ("word_count", count.word_count),
            ("line_count", count.line_count),
        ])
    }
}

pub fn module() -> Module {
    Module::new(
        Declaration::new(TYPE_ID, "Counts characters, words and lines").with_tags(&["text", "analyze"]),
        |_| ModuleDefinition {
            configuration: ConfigurationModel::empty(),
            inputs: text_input(),
            outputs: Box::new(|args: GeneratorArgs| text_output(args, |text, _, _| Some(Data::from(count_tokens(text))))),
        },
    )
}
