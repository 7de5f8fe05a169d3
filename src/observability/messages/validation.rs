// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for workflow description validation.
//!
//! This module contains message types for logging events related to:
//! * Duplicate module and connection ids
//! * Connections or layers referencing undeclared modules
//! * Feedback loops in the module graph

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A feedback loop was found in the module graph.
///
/// Loops are legal in a push-based flow, but a loop without a filtering
/// module re-emits forever, so they are worth a warning.
///
/// # Log Level
/// `warn!` - Potential issue
///
/// # Example
/// ```
/// use the_flowgraph::observability::messages::validation::FeedbackLoopDetected;
///
/// let cycle = vec!["a", "b", "a"];
/// let msg = FeedbackLoopDetected { cycle: &cycle };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct FeedbackLoopDetected<'a> {
    pub cycle: &'a [&'a str],
}

impl Display for FeedbackLoopDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Feedback loop detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for FeedbackLoopDetected<'_> {
    fn log(&self) {
        tracing::warn!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "span_name",
            name = name,
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
        )
    }
}

/// A connection or layer references a module that is not declared.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct UnresolvedModule<'a> {
    pub referenced_by: &'a str,
    pub module_id: &'a str,
}

impl Display for UnresolvedModule<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "'{}' references undeclared module '{}'",
            self.referenced_by, self.module_id
        )
    }
}

impl StructuredLog for UnresolvedModule<'_> {
    fn log(&self) {
        tracing::error!(
            referenced_by = self.referenced_by,
            module_id = self.module_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            referenced_by = self.referenced_by,
            module_id = self.module_id,
        )
    }
}

/// Duplicate module id in a workflow description.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DuplicateModuleId<'a> {
    pub module_id: &'a str,
}

impl Display for DuplicateModuleId<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate module ID: '{}'", self.module_id)
    }
}

impl StructuredLog for DuplicateModuleId<'_> {
    fn log(&self) {
        tracing::error!(module_id = self.module_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            module_id = self.module_id,
        )
    }
}

/// Two connections in a workflow description share an id, either given or
/// derived from their slot addresses.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DuplicateConnectionId<'a> {
    pub connection_id: &'a str,
}

impl Display for DuplicateConnectionId<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate connection ID: '{}'", self.connection_id)
    }
}

impl StructuredLog for DuplicateConnectionId<'_> {
    fn log(&self) {
        tracing::error!(connection_id = self.connection_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            connection_id = self.connection_id,
        )
    }
}
