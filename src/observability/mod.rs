// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for the operational
//! logging of the flowgraph. Message types follow a struct-based pattern
//! with a `Display` implementation so that log lines are not magic strings
//! scattered throughout the codebase.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::contract` - contract resolution at input slots
//! * `messages::slot` - slot delivery and connection lifecycle
//! * `messages::validation` - workflow description validation
//! * `messages::workflow` - module instantiation and graph construction
//!
//! Per-message diagnostics (resolution trees, adapted payloads) go to the
//! owning module's [`ExecutionJournal`](crate::journal::ExecutionJournal);
//! journal entries are mirrored to `tracing` as well.
//!
//! # Usage
//!
//! ```rust
//! use the_flowgraph::observability::messages::contract::ContractRejected;
//!
//! let msg = ContractRejected {
//!     module_id: "reverse",
//!     slot_id: "input$",
//!     contract: "text",
//!     rejected_children: 2,
//! };
//!
//! tracing::warn!("{}", msg);
//! ```

pub mod messages;
