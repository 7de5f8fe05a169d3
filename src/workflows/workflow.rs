// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;

use super::layer::Layer;
use crate::config::consts::ROOT_LAYER_ID;
use crate::connections::Connection;
use crate::modules::ModuleInstance;

/// Module instances, the connections between them and the layer tree.
///
/// A `Workflow` is a value: building a new one from an old one shares the
/// untouched modules and connections. A connection lives as long as some
/// workflow still holds it.
#[derive(Clone)]
pub struct Workflow {
    modules: BTreeMap<String, Arc<ModuleInstance>>,
    connections: BTreeMap<String, Arc<Connection>>,
    root_layer: Layer,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new(BTreeMap::new(), BTreeMap::new(), Layer::new(Some(ROOT_LAYER_ID.to_string()), vec![], vec![]))
    }
}

impl Workflow {
    pub fn new(
        modules: BTreeMap<String, Arc<ModuleInstance>>,
        connections: BTreeMap<String, Arc<Connection>>,
        root_layer: Layer,
    ) -> Self {
        Self {
            modules,
            connections,
            root_layer,
        }
    }

    pub fn get_module(&self, module_id: &str) -> Option<Arc<ModuleInstance>> {
        self.modules.get(module_id).cloned()
    }

    pub fn get_connection(&self, uid: &str) -> Option<&Arc<Connection>> {
        self.connections.get(uid)
    }

    pub fn modules(&self) -> impl Iterator<Item = &Arc<ModuleInstance>> {
        self.modules.values()
    }

    pub fn connections(&self) -> impl Iterator<Item = &Arc<Connection>> {
        self.connections.values()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn root_layer(&self) -> &Layer {
        &self.root_layer
    }

    /// Modules no connection feeds.
    pub fn entry_modules(&self) -> Vec<Arc<ModuleInstance>> {
        self.modules
            .values()
            .filter(|m| !self.connections.values().any(|c| c.end().module_id == m.uid()))
            .cloned()
            .collect()
    }

    /// Modules feeding no connection.
    pub fn sink_modules(&self) -> Vec<Arc<ModuleInstance>> {
        self.modules
            .values()
            .filter(|m| !self.connections.values().any(|c| c.start().module_id == m.uid()))
            .cloned()
            .collect()
    }

    pub(crate) fn parts(
        &self,
    ) -> (&BTreeMap<String, Arc<ModuleInstance>>, &BTreeMap<String, Arc<Connection>>) {
        (&self.modules, &self.connections)
    }
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .field("connections", &self.connections.keys().collect::<Vec<_>>())
            .field("root_layer", &self.root_layer)
            .finish()
    }
}
