// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The built-in `reactive` toolbox: producers and stream combinators.
//!
//! Producers (`of`, `timer`) have no input and start emitting as soon as
//! they are instantiated; their output slot keeps the latest message for
//! connections made afterwards. Combinators accept anything on their
//! inputs and read their settings from the static configuration.

pub mod combine_latest;
pub mod console;
pub mod merge;
pub mod of;
pub mod take;
pub mod timer;

use crate::config::consts::DEFAULT_OUTPUT_SLOT;
use crate::data::Data;
use crate::modules::{Input, OutputMessage, ProcessingMessage};
use crate::streams::Observable;
use crate::toolboxes::ToolBox;

pub const TOOLBOX_NAME: &str = "reactive";
/// First input of the two-input combinators
pub const FIRST_INPUT_SLOT: &str = "input_0$";
/// Second input of the two-input combinators
pub const SECOND_INPUT_SLOT: &str = "input_1$";

pub fn toolbox() -> ToolBox {
    ToolBox::new(TOOLBOX_NAME, env!("CARGO_PKG_VERSION"))
        .with_module(of::module())
        .with_module(timer::module())
        .with_module(take::module())
        .with_module(merge::module())
        .with_module(combine_latest::module())
        .with_module(console::module())
}

fn free_input(slot_id: &str, description: &str) -> (String, Input) {
    (slot_id.to_string(), Input::new(description))
}

fn forwarded(message: &ProcessingMessage) -> OutputMessage {
    message.output(message.data.clone())
}

fn single_output(output: Observable<OutputMessage>) -> Vec<(String, Observable<OutputMessage>)> {
    vec![(DEFAULT_OUTPUT_SLOT.to_string(), output)]
}

/// Integer setting floored at zero; zero when missing.
fn non_negative(configuration: &Data, key: &str) -> u64 {
    configuration
        .get(key)
        .and_then(Data::as_i64)
        .map(|value| value.max(0) as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod test_support {
    use std::sync::{Arc, Mutex};

    use crate::data::Data;
    use crate::modules::{Message, ModuleInstance};
    use crate::streams::Subscription;

    pub struct Recorded {
        pub messages: Arc<Mutex<Vec<Message>>>,
        pub completed: Arc<tokio::sync::Notify>,
        pub _subscription: Subscription,
    }

    impl Recorded {
        pub fn data(&self) -> Vec<Data> {
            self.messages.lock().unwrap().iter().map(|m| m.data.clone()).collect()
        }
    }

    /// Record the first output slot of `instance`, completion included.
    pub fn record(instance: &ModuleInstance) -> Recorded {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let completed = Arc::new(tokio::sync::Notify::new());
        let (sink, notify) = (messages.clone(), completed.clone());
        let subscription = instance.output_slots()[0].observable().subscribe_with(
            move |m: &Message| sink.lock().unwrap().push(m.clone()),
            move || notify.notify_one(),
        );
        Recorded {
            messages,
            completed,
            _subscription: subscription,
        }
    }
}
