// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for slot delivery and connection lifecycle events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A raw message reached an input slot and is about to be resolved.
///
/// # Log Level
/// `trace!` - High-volume detail
pub struct SlotMessageReceived<'a> {
    pub module_id: &'a str,
    pub slot_id: &'a str,
    pub data_kind: &'a str,
}

impl Display for SlotMessageReceived<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Slot '{}' of module '{}' received {}",
            self.slot_id, self.module_id, self.data_kind
        )
    }
}

impl StructuredLog for SlotMessageReceived<'_> {
    fn log(&self) {
        tracing::trace!(
            module_id = self.module_id,
            slot_id = self.slot_id,
            data_kind = self.data_kind,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "input_slot",
            span_name = name,
            module_id = self.module_id,
            slot_id = self.slot_id,
        )
    }
}

/// A validated message was published on an input slot's prepared stream.
///
/// # Log Level
/// `debug!` - Per-message detail
pub struct SlotMessageDelivered<'a> {
    pub module_id: &'a str,
    pub slot_id: &'a str,
    pub delivered: u64,
}

impl Display for SlotMessageDelivered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Slot '{}' of module '{}' delivered message #{}",
            self.slot_id, self.module_id, self.delivered
        )
    }
}

impl StructuredLog for SlotMessageDelivered<'_> {
    fn log(&self) {
        tracing::debug!(
            module_id = self.module_id,
            slot_id = self.slot_id,
            delivered = self.delivered,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "slot_delivery",
            span_name = name,
            module_id = self.module_id,
            slot_id = self.slot_id,
        )
    }
}

/// A module emitted a message on one of its output slots.
///
/// # Log Level
/// `trace!` - High-volume detail
pub struct OutputEmitted<'a> {
    pub module_id: &'a str,
    pub slot_id: &'a str,
    pub data_kind: &'a str,
}

impl Display for OutputEmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' emitted {} on '{}'",
            self.module_id, self.data_kind, self.slot_id
        )
    }
}

impl StructuredLog for OutputEmitted<'_> {
    fn log(&self) {
        tracing::trace!(
            module_id = self.module_id,
            slot_id = self.slot_id,
            data_kind = self.data_kind,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "output_emitted",
            span_name = name,
            module_id = self.module_id,
            slot_id = self.slot_id,
        )
    }
}

/// A connection is resolving its two ends.
///
/// # Log Level
/// `debug!` - Graph wiring detail
pub struct ConnectionRequested<'a> {
    pub connection_id: &'a str,
    pub start: &'a str,
    pub end: &'a str,
}

impl Display for ConnectionRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Connecting '{}': {} -> {}",
            self.connection_id, self.start, self.end
        )
    }
}

impl StructuredLog for ConnectionRequested<'_> {
    fn log(&self) {
        tracing::debug!(
            connection_id = self.connection_id,
            start = self.start,
            end = self.end,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "connection",
            span_name = name,
            connection_id = self.connection_id,
        )
    }
}

/// A connection subscribed its destination slot to its source slot.
///
/// # Log Level
/// `info!` - Graph wiring event
///
/// # Example
/// ```
/// use the_flowgraph::observability::messages::slot::ConnectionEstablished;
///
/// let msg = ConnectionEstablished {
///     connection_id: "output$@upper-input$@reverse",
///     adapted: false,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ConnectionEstablished<'a> {
    pub connection_id: &'a str,
    pub adapted: bool,
}

impl Display for ConnectionEstablished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Connection '{}' established (adaptor: {})",
            self.connection_id,
            if self.adapted { "yes" } else { "none" }
        )
    }
}

impl StructuredLog for ConnectionEstablished<'_> {
    fn log(&self) {
        tracing::info!(
            connection_id = self.connection_id,
            adapted = self.adapted,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "connection_established",
            span_name = name,
            connection_id = self.connection_id,
        )
    }
}

/// A connection stopped forwarding, either on request or because its source
/// completed.
///
/// # Log Level
/// `info!` - Graph wiring event
pub struct ConnectionClosed<'a> {
    pub connection_id: &'a str,
    pub reason: &'a str,
}

impl Display for ConnectionClosed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Connection '{}' closed: {}", self.connection_id, self.reason)
    }
}

impl StructuredLog for ConnectionClosed<'_> {
    fn log(&self) {
        tracing::info!(
            connection_id = self.connection_id,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "connection_closed",
            span_name = name,
            connection_id = self.connection_id,
        )
    }
}

/// A message crossed a connection.
///
/// # Log Level
/// `trace!` - High-volume detail
pub struct DataTransiting<'a> {
    pub connection_id: &'a str,
    pub data_kind: &'a str,
}

impl Display for DataTransiting<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Connection '{}' forwarding {}",
            self.connection_id, self.data_kind
        )
    }
}

impl StructuredLog for DataTransiting<'_> {
    fn log(&self) {
        tracing::trace!(
            connection_id = self.connection_id,
            data_kind = self.data_kind,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "data_transiting",
            span_name = name,
            connection_id = self.connection_id,
        )
    }
}
