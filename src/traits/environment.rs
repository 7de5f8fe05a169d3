// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::Data;
use crate::errors::GraphError;
use crate::modules::ModuleInstance;
use crate::toolboxes::ToolBox;

/// A request to instantiate a module of a given type.
#[derive(Debug, Clone, Default)]
pub struct InstantiationRequest {
    pub type_id: String,
    pub module_id: Option<String>,
    pub configuration: Data,
}

impl InstantiationRequest {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            ..Default::default()
        }
    }

    pub fn with_module_id(mut self, module_id: impl Into<String>) -> Self {
        self.module_id = Some(module_id.into());
        self
    }

    pub fn with_configuration(mut self, configuration: Data) -> Self {
        self.configuration = configuration;
        self
    }
}

/// Resolves module types to runnable instances.
#[async_trait]
pub trait Environment: Send + Sync {
    /// Fails with [`GraphError::UnknownModuleType`] when no imported toolbox
    /// provides `type_id`.
    async fn instantiate_module(&self, request: InstantiationRequest) -> Result<ModuleInstance, GraphError>;

    /// Make a toolbox's modules available for instantiation.
    async fn import(&self, toolbox: &str) -> Result<Arc<ToolBox>, GraphError>;
}
