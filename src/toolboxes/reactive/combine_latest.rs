// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{free_input, single_output, FIRST_INPUT_SLOT, SECOND_INPUT_SLOT};
use crate::config::ConfigurationModel;
use crate::data::Data;
use crate::modules::{Declaration, GeneratorArgs, Module, ModuleDefinition, ProcessingMessage};

pub const TYPE_ID: &str = "combine_latest";

pub fn module() -> Module {
    Module::new(
        Declaration::new(
            TYPE_ID,
            "Emits [first, second] with the latest message of each input, once both have one",
        )
        .with_tags(&["reactive", "combination"]),
        |_| ModuleDefinition {
            configuration: ConfigurationModel::empty(),
            inputs: vec![
                free_input(FIRST_INPUT_SLOT, "first stream"),
                free_input(SECOND_INPUT_SLOT, "second stream"),
            ],
            outputs: Box::new(|args: GeneratorArgs| {
                // The output rides on the context of the message that triggered it.
                let second_last = Arc::new(AtomicBool::new(false));
                let (on_first, on_second) = (second_last.clone(), second_last.clone());
                let first = args
                    .input(FIRST_INPUT_SLOT)
                    .tap(move |_| on_first.store(false, Ordering::SeqCst));
                let second = args
                    .input(SECOND_INPUT_SLOT)
                    .tap(move |_| on_second.store(true, Ordering::SeqCst));

                let combined = first.combine_latest(&second).map(
                    move |(first, second): &(ProcessingMessage, ProcessingMessage)| {
                        let trigger = if second_last.load(Ordering::SeqCst) { second } else { first };
                        trigger.output(Data::Array(vec![first.data.clone(), second.data.clone()]))
                    },
                );
                single_output(combined)
            }),
        },
    )
}
