// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The built-in `text` toolbox.
//!
//! Every module here has a single `input$` slot accepting either a text or a
//! record with a `text` attribute, and a single `output$` slot.

pub mod change_text_case;
pub mod prefix_suffix_adder;
pub mod reverse_text;
pub mod token_counter;
pub mod word_frequency_analyzer;

use crate::config::consts::{DEFAULT_INPUT_SLOT, DEFAULT_OUTPUT_SLOT};
use crate::contracts::{expect, expect_any_of, expect_attribute, Expectation};
use crate::data::Data;
use crate::modules::{GeneratorArgs, Input, OutputMessage, ProcessingMessage};
use crate::streams::Observable;
use crate::toolboxes::ToolBox;

pub const TOOLBOX_NAME: &str = "text";

pub fn toolbox() -> ToolBox {
    ToolBox::new(TOOLBOX_NAME, env!("CARGO_PKG_VERSION"))
        .with_module(change_text_case::module())
        .with_module(prefix_suffix_adder::module())
        .with_module(reverse_text::module())
        .with_module(token_counter::module())
        .with_module(word_frequency_analyzer::module())
}

/// A text, given directly or as the `text` attribute of a record.
pub fn expect_text() -> Expectation {
    let direct = expect("a text", |d: &Data| d.as_str().is_some());
    expect_any_of(
        "a text, or a record with a text attribute",
        vec![direct.clone(), expect_attribute("text", direct)],
    )
}

fn text_input() -> Vec<(String, Input)> {
    vec![(
        DEFAULT_INPUT_SLOT.to_string(),
        Input::new("the text to process").with_contract(expect_text()),
    )]
}

/// Single output computed from each message's text and configuration.
/// `None` drops the message.
fn text_output<F>(args: GeneratorArgs, f: F) -> Vec<(String, Observable<OutputMessage>)>
where
    F: Fn(&str, &Data, &ProcessingMessage) -> Option<Data> + Send + Sync + 'static,
{
    let output = args.input(DEFAULT_INPUT_SLOT).filter_map(move |message: &ProcessingMessage| {
        let text = message.data.as_str()?;
        f(text, &message.configuration, message).map(|data| message.output(data))
    });
    vec![(DEFAULT_OUTPUT_SLOT.to_string(), output)]
}
