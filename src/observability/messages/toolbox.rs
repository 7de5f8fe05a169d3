// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types emitted by built-in toolbox modules.

use crate::data::Data;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A `console` module received a message.
///
/// # Log Level
/// `info!` - The point of the module is to be seen
///
/// # Example
/// ```
/// use the_flowgraph::data::Data;
/// use the_flowgraph::observability::messages::toolbox::ConsoleEcho;
///
/// let data = Data::from("hello");
/// let msg = ConsoleEcho { prefix: "console", data: &data };
///
/// assert_eq!(msg.to_string(), "[console] hello");
/// ```
pub struct ConsoleEcho<'a> {
    pub prefix: &'a str,
    pub data: &'a Data,
}

impl Display for ConsoleEcho<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "[{}] {}", self.prefix, self.data)
    }
}

impl StructuredLog for ConsoleEcho<'_> {
    fn log(&self) {
        tracing::info!(
            prefix = self.prefix,
            data_kind = self.data.kind(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("console_echo", span_name = name, prefix = self.prefix)
    }
}
