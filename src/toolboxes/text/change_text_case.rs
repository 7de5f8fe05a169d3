// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{text_input, text_output};
use crate::config::{Attribute, ConfigurationModel, Schema};
use crate::data::Data;
use crate::modules::{Declaration, GeneratorArgs, Module, ModuleDefinition};

pub const TYPE_ID: &str = "change_text_case";

const SMALL_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

/// Convert `input` to `case`: "upper", "lower", "proper" (every word
/// capitalized) or "title" (like proper, but small words stay lowercase
/// except in first position). `None` for an unknown case.
pub fn change_case(input: &str, case: &str) -> Option<String> {
    let converted = match case {
        "upper" => input.to_uppercase(),
        "lower" => input.to_lowercase(),
        "proper" => input.split_whitespace().map(capitalize).collect::<Vec<_>>().join(" "),
        "title" => input
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| {
                let lower_word = word.to_lowercase();
                if i == 0 || !SMALL_WORDS.contains(&lower_word.as_str()) {
                    capitalize(word)
                } else {
                    lower_word
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        _ => return None,
    };
    Some(converted)
}

pub fn module() -> Module {
    Module::new(
        Declaration::new(TYPE_ID, "Converts text to upper, lower, proper or title case")
            .with_tags(&["text", "transform"]),
        |_| ModuleDefinition {
            configuration: ConfigurationModel::new([("case", Schema::from(Attribute::text("upper")))]),
            inputs: text_input(),
            outputs: Box::new(|args: GeneratorArgs| {
                text_output(args, |text, configuration, message| {
                    let case = configuration.get("case").and_then(Data::as_str).unwrap_or("upper");
                    match change_case(text, case) {
                        Some(converted) => Some(Data::from(converted)),
                        None => {
                            message.context.error(format!("Unknown case type: {}", case), Data::Null);
                            None
                        }
                    }
                })
            }),
        },
    )
}
