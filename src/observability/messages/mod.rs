// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for a human-readable line and
//! `StructuredLog` to emit the same event with typed fields attached.
//!
//! # Organization
//!
//! * `contract` - contract resolution outcomes at input slots
//! * `slot` - message delivery through slots and connections
//! * `workflow` - module instantiation and graph construction
//! * `validation` - workflow description validation
//! * `toolbox` - events from built-in toolbox modules
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_flowgraph::observability::messages::StructuredLog;
//! use the_flowgraph::observability::messages::workflow::ModuleInstantiated;
//!
//! let msg = ModuleInstantiated {
//!     module_id: "upper",
//!     type_id: "change_text_case",
//!     input_slots: 1,
//!     output_slots: 1,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod contract;
pub mod slot;
pub mod toolbox;
pub mod validation;
pub mod workflow;

/// Emit a message as a structured `tracing` event, or wrap work in a span
/// carrying the message fields.
pub trait StructuredLog {
    fn log(&self);

    fn span(&self, name: &str) -> Span;
}
