// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message shapes along the path output slot -> connection -> input slot ->
//! module logic -> output slot.

use crate::data::Data;
use crate::journal::Context;

/// A message as exposed outside a module: payload plus the user context
/// supplied by whoever originated it. Internal diagnostics never ride along.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    pub data: Data,
    pub context: Data,
}

impl Message {
    pub fn new(data: impl Into<Data>) -> Self {
        Self {
            data: data.into(),
            context: Data::empty_record(),
        }
    }

    pub fn with_context(mut self, context: Data) -> Self {
        self.context = context;
        self
    }
}

/// A message arriving at an input slot. `configuration` overrides the
/// module's static configuration for this message only; `Null` means none.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputMessage {
    pub data: Data,
    pub configuration: Data,
    pub context: Data,
}

impl InputMessage {
    pub fn new(data: impl Into<Data>) -> Self {
        Self {
            data: data.into(),
            configuration: Data::Null,
            context: Data::empty_record(),
        }
    }

    pub fn with_configuration(mut self, configuration: Data) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn with_context(mut self, context: Data) -> Self {
        self.context = context;
        self
    }
}

impl From<Message> for InputMessage {
    fn from(message: Message) -> Self {
        Self {
            data: message.data,
            configuration: Data::Null,
            context: message.context,
        }
    }
}

/// A validated message handed to module logic: normalized data, the
/// extracted configuration, and the diagnostic page opened for it.
#[derive(Debug, Clone)]
pub struct ProcessingMessage {
    pub data: Data,
    pub configuration: Data,
    pub context: Context,
}

impl ProcessingMessage {
    /// Output carrying the same diagnostic context.
    pub fn output(&self, data: impl Into<Data>) -> OutputMessage {
        OutputMessage {
            data: data.into(),
            context: self.context.clone(),
        }
    }
}

/// What module logic emits. The context is stripped to its user part before
/// the message leaves the module.
#[derive(Debug, Clone)]
pub struct OutputMessage {
    pub data: Data,
    pub context: Context,
}
