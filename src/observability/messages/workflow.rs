// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for module instantiation and graph construction.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A module instance was built and its slots wired.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ModuleInstantiated<'a> {
    pub module_id: &'a str,
    pub type_id: &'a str,
    pub input_slots: usize,
    pub output_slots: usize,
}

impl Display for ModuleInstantiated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' of type '{}' instantiated: {} input slots, {} output slots",
            self.module_id, self.type_id, self.input_slots, self.output_slots
        )
    }
}

impl StructuredLog for ModuleInstantiated<'_> {
    fn log(&self) {
        tracing::info!(
            module_id = self.module_id,
            type_id = self.type_id,
            input_slots = self.input_slots,
            output_slots = self.output_slots,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "module_instantiation",
            span_name = name,
            module_id = self.module_id,
            type_id = self.type_id,
        )
    }
}

/// An environment was asked for a module instance.
///
/// # Log Level
/// `debug!` - Graph construction detail
pub struct InstantiationRequested<'a> {
    pub type_id: &'a str,
    pub module_id: Option<&'a str>,
}

impl Display for InstantiationRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.module_id {
            Some(module_id) => write!(f, "Instantiating '{}' as '{}'", self.type_id, module_id),
            None => write!(f, "Instantiating '{}'", self.type_id),
        }
    }
}

impl StructuredLog for InstantiationRequested<'_> {
    fn log(&self) {
        tracing::debug!(
            type_id = self.type_id,
            module_id = self.module_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "instantiate_module",
            span_name = name,
            type_id = self.type_id,
            module_id = self.module_id,
        )
    }
}

/// The environment could not resolve a module type.
///
/// # Log Level
/// `error!` - Graph construction fails
///
/// # Example
/// ```
/// use the_flowgraph::observability::messages::workflow::UnknownModuleType;
///
/// let msg = UnknownModuleType { type_id: "sphere", known_types: 5 };
///
/// tracing::error!("{}", msg);
/// ```
pub struct UnknownModuleType<'a> {
    pub type_id: &'a str,
    pub known_types: usize,
}

impl Display for UnknownModuleType<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Unknown module type '{}' ({} types registered)",
            self.type_id, self.known_types
        )
    }
}

impl StructuredLog for UnknownModuleType<'_> {
    fn log(&self) {
        tracing::error!(
            type_id = self.type_id,
            known_types = self.known_types,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("unknown_module_type", span_name = name, type_id = self.type_id)
    }
}

/// A toolbox was imported into an environment.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ToolboxImported<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub module_count: usize,
}

impl Display for ToolboxImported<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Toolbox '{}' v{} imported: {} modules",
            self.name, self.version, self.module_count
        )
    }
}

impl StructuredLog for ToolboxImported<'_> {
    fn log(&self) {
        tracing::info!(
            toolbox = self.name,
            version = self.version,
            module_count = self.module_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("toolbox_import", span_name = name, toolbox = self.name)
    }
}

/// Flows were added to a project, producing a new workflow value.
///
/// # Log Level
/// `debug!` - Graph construction detail
pub struct FlowsAdded {
    pub modules: usize,
    pub connections: usize,
}

impl Display for FlowsAdded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow rebuilt: {} modules, {} connections",
            self.modules, self.connections
        )
    }
}

impl StructuredLog for FlowsAdded {
    fn log(&self) {
        tracing::debug!(
            modules = self.modules,
            connections = self.connections,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("flows_added", span_name = name, modules = self.modules)
    }
}
