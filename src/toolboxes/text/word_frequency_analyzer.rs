// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use super::{text_input, text_output};
use crate::config::{Attribute, ConfigurationModel, Schema};
use crate::data::Data;
use crate::modules::{Declaration, GeneratorArgs, Module, ModuleDefinition};

pub const TYPE_ID: &str = "word_frequency_analyzer";

/// Word counts, most frequent first (ties alphabetical). Words are
/// lowercased and stripped of non alphanumeric characters. `top == 0`
/// keeps every word.
pub fn word_frequencies(input: &str, top: usize) -> Vec<(String, usize)> {
    let mut word_counts: HashMap<String, usize> = HashMap::new();

    for word in input.split_whitespace() {
        let normalized_word = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        if !normalized_word.is_empty() {
            *word_counts.entry(normalized_word).or_insert(0) += 1;
        }
    }

    let mut frequencies: Vec<(String, usize)> = word_counts.into_iter().collect();
    frequencies.sort_by(|(wa, ca), (wb, cb)| cb.cmp(ca).then_with(|| wa.cmp(wb)));
    if top > 0 {
        frequencies.truncate(top);
    }
    frequencies
}

pub fn module() -> Module {
    Module::new(
        Declaration::new(TYPE_ID, "Ranks the words of a text by frequency").with_tags(&["text", "analyze"]),
        |_| ModuleDefinition {
            configuration: ConfigurationModel::new([("top", Schema::from(Attribute::integer(0).with_min(0)))]),
            inputs: text_input(),
            outputs: Box::new(|args: GeneratorArgs| {
                text_output(args, |text, configuration, _| {
                    let top = configuration.get("top").and_then(Data::as_i64).unwrap_or(0).max(0) as usize;
                    let unique = word_frequencies(text, 0).len();
                    let ranked: Vec<Data> = word_frequencies(text, top)
                        .into_iter()
                        .map(|(word, count)| Data::record([("word", Data::from(word)), ("count", Data::from(count))]))
                        .collect();
                    Some(Data::record([
                        ("total_unique_words", Data::from(unique)),
                        ("frequencies", Data::Array(ranked)),
                    ]))
                })
            }),
        },
    )
}
