// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::Instrument;

use crate::errors::GraphError;
use crate::modules::{ForwardArgs, Module, ModuleInstance};
use crate::observability::messages::workflow::{InstantiationRequested, ToolboxImported, UnknownModuleType};
use crate::observability::messages::StructuredLog;
use crate::traits::{Environment, InstantiationRequest, ModuleFactory};

/// A named, versioned set of module types.
#[derive(Clone)]
pub struct ToolBox {
    pub name: String,
    pub version: String,
    pub modules: Vec<Arc<dyn ModuleFactory>>,
}

impl ToolBox {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            modules: Vec::new(),
        }
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(Arc::new(module));
        self
    }

    pub fn with_factory(mut self, factory: Arc<dyn ModuleFactory>) -> Self {
        self.modules.push(factory);
        self
    }

    pub fn module(&self, type_id: &str) -> Option<&Arc<dyn ModuleFactory>> {
        self.modules.iter().find(|m| m.type_id() == type_id)
    }
}

impl std::fmt::Debug for ToolBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolBox")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("modules", &self.modules.iter().map(|m| m.type_id()).collect::<Vec<_>>())
            .finish()
    }
}

/// Module factories by type id. Registering a type twice keeps the latest.
#[derive(Default, Clone)]
pub struct ModuleRegistry {
    factories: BTreeMap<String, Arc<dyn ModuleFactory>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, factory: Arc<dyn ModuleFactory>) {
        self.factories.insert(factory.type_id().to_string(), factory);
    }

    pub fn register_toolbox(&mut self, toolbox: &ToolBox) {
        for factory in &toolbox.modules {
            self.register(factory.clone());
        }
    }

    pub fn get(&self, type_id: &str) -> Option<Arc<dyn ModuleFactory>> {
        self.factories.get(type_id).cloned()
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.factories.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn type_ids(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

/// In-process environment.
///
/// Toolboxes in the catalog are only instantiable once imported; modules
/// registered directly are available immediately.
#[derive(Default)]
pub struct LocalEnvironment {
    registry: RwLock<ModuleRegistry>,
    catalog: BTreeMap<String, Arc<ToolBox>>,
}

impl LocalEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a toolbox importable by name.
    pub fn with_toolbox(mut self, toolbox: ToolBox) -> Self {
        self.catalog.insert(toolbox.name.clone(), Arc::new(toolbox));
        self
    }

    /// Register a module type without going through a toolbox.
    pub fn with_module(mut self, module: Module) -> Self {
        self.registry.get_mut().register(Arc::new(module));
        self
    }

    /// Catalog holding the built-in toolboxes, none imported yet.
    pub fn builtin() -> Self {
        Self::new()
            .with_toolbox(crate::toolboxes::text::toolbox())
            .with_toolbox(crate::toolboxes::reactive::toolbox())
    }

    pub async fn registered_types(&self) -> Vec<String> {
        self.registry.read().await.type_ids().into_iter().map(String::from).collect()
    }
}

#[async_trait]
impl Environment for LocalEnvironment {
    async fn instantiate_module(&self, request: InstantiationRequest) -> Result<ModuleInstance, GraphError> {
        let requested = InstantiationRequested {
            type_id: &request.type_id,
            module_id: request.module_id.as_deref(),
        };
        let span = requested.span("environment");
        span.in_scope(|| requested.log());

        let factory = {
            let registry = self.registry.read().await;
            match registry.get(&request.type_id) {
                Some(factory) => factory,
                None => {
                    UnknownModuleType {
                        type_id: &request.type_id,
                        known_types: registry.len(),
                    }
                    .log();
                    return Err(GraphError::UnknownModuleType {
                        type_id: request.type_id,
                    });
                }
            }
        };

        factory
            .instantiate(ForwardArgs {
                uid: request.module_id,
                configuration: request.configuration,
            })
            .instrument(span)
            .await
    }

    async fn import(&self, toolbox: &str) -> Result<Arc<ToolBox>, GraphError> {
        let found = self.catalog.get(toolbox).cloned().ok_or_else(|| GraphError::UnknownToolbox {
            name: toolbox.to_string(),
        })?;

        self.registry.write().await.register_toolbox(&found);
        ToolboxImported {
            name: &found.name,
            version: &found.version,
            module_count: found.modules.len(),
        }
        .log();
        Ok(found)
    }
}
