// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;

use super::layer::Layer;
use super::workflow::Workflow;
use crate::config::consts::ROOT_LAYER_ID;
use crate::config::{validate_workflow_config, WorkflowConfig};
use crate::connections::{Adaptor, Connection, SlotAddress};
use crate::data::Data;
use crate::errors::{ConfigError, GraphError, SlotDirection};
use crate::modules::{InputSlot, Message, ModuleInstance};
use crate::observability::messages::workflow::FlowsAdded;
use crate::observability::messages::StructuredLog;
use crate::streams::Observable;
use crate::toolboxes::ToolBox;
use crate::traits::{Environment, InstantiationRequest};

/// One step of a flow: a module and the slots the flow goes through.
/// Unnamed slots default to the module's first input or output.
#[derive(Clone)]
pub struct FlowNode {
    pub module: Arc<ModuleInstance>,
    pub input: Option<String>,
    pub output: Option<String>,
    /// Applied to messages entering this node.
    pub adaptor: Option<Adaptor>,
}

impl FlowNode {
    pub fn new(module: Arc<ModuleInstance>) -> Self {
        Self {
            module,
            input: None,
            output: None,
            adaptor: None,
        }
    }

    pub fn with_input(mut self, slot_id: impl Into<String>) -> Self {
        self.input = Some(slot_id.into());
        self
    }

    pub fn with_output(mut self, slot_id: impl Into<String>) -> Self {
        self.output = Some(slot_id.into());
        self
    }

    pub fn with_adaptor(mut self, adaptor: Adaptor) -> Self {
        self.adaptor = Some(adaptor);
        self
    }

    fn input_slot(&self) -> Result<String, GraphError> {
        self.input
            .clone()
            .or_else(|| self.module.input_slots().first().map(|s| s.slot_id().to_string()))
            .ok_or_else(|| GraphError::MissingSlot {
                module_id: self.module.uid().to_string(),
                direction: SlotDirection::Input,
            })
    }

    fn output_slot(&self) -> Result<String, GraphError> {
        self.output
            .clone()
            .or_else(|| self.module.output_slots().first().map(|s| s.slot_id().to_string()))
            .ok_or_else(|| GraphError::MissingSlot {
                module_id: self.module.uid().to_string(),
                direction: SlotDirection::Output,
            })
    }
}

/// The graph under construction together with the environment resolving its
/// module types.
///
/// Every construction step returns a new state; connections not yet wired
/// are connected when a state is created.
#[derive(Clone)]
pub struct ProjectState {
    main: Workflow,
    environment: Arc<dyn Environment>,
}

impl ProjectState {
    pub fn new(main: Workflow, environment: Arc<dyn Environment>) -> Result<Self, GraphError> {
        for connection in main.connections() {
            if !connection.is_connected() {
                connection.connect(|uid| main.get_module(uid))?;
            }
        }
        Ok(Self { main, environment })
    }

    pub fn empty(environment: Arc<dyn Environment>) -> Self {
        Self {
            main: Workflow::default(),
            environment,
        }
    }

    pub fn main(&self) -> &Workflow {
        &self.main
    }

    pub fn environment(&self) -> &Arc<dyn Environment> {
        &self.environment
    }

    /// Import a toolbox into the environment.
    pub async fn import(&self, toolbox: &str) -> Result<Arc<ToolBox>, GraphError> {
        self.environment.import(toolbox).await
    }

    /// Build a module instance. It joins the workflow once used in a flow.
    pub async fn instantiate(
        &self,
        type_id: &str,
        module_id: Option<&str>,
        configuration: Data,
    ) -> Result<Arc<ModuleInstance>, GraphError> {
        let mut request = InstantiationRequest::new(type_id).with_configuration(configuration);
        request.module_id = module_id.map(String::from);
        let instance = self.environment.instantiate_module(request).await?;
        Ok(Arc::new(instance))
    }

    /// Add the modules of every flow and connect each node to the next one.
    /// New modules land in the root layer. A wire already in the workflow
    /// gives `DuplicateConnection`.
    pub fn add_flows(&self, flows: Vec<Vec<FlowNode>>) -> Result<ProjectState, GraphError> {
        let (modules, connections) = self.main.parts();
        let (mut modules, mut connections) = (modules.clone(), connections.clone());
        let mut root = self.main.root_layer().clone();

        for flow in &flows {
            for node in flow {
                let uid = node.module.uid().to_string();
                if !root.contains_module(&uid) {
                    root.module_ids.push(uid.clone());
                }
                modules.insert(uid, node.module.clone());
            }
            for pair in flow.windows(2) {
                let (start, end) = (&pair[0], &pair[1]);
                let connection = Connection::new(
                    SlotAddress::new(start.module.uid(), start.output_slot()?),
                    SlotAddress::new(end.module.uid(), end.input_slot()?),
                    end.adaptor.clone(),
                );
                insert_connection(&mut connections, connection)?;
            }
        }

        FlowsAdded {
            modules: modules.len(),
            connections: connections.len(),
        }
        .log();
        ProjectState::new(Workflow::new(modules, connections, root), self.environment.clone())
    }

    /// Group modules and layers (by uid) into a new layer under `parent`
    /// (the root layer when `None`). Unknown uids are ignored.
    pub fn add_layer(
        &self,
        parent: Option<&str>,
        layer_id: Option<&str>,
        uids: &[&str],
    ) -> Result<ProjectState, GraphError> {
        let root = self.main.root_layer();
        let module_ids: Vec<String> = uids
            .iter()
            .filter(|uid| self.main.get_module(uid).is_some())
            .map(|uid| uid.to_string())
            .collect();
        let layers = root.filter(|layer| layer.uid != root.uid && uids.contains(&layer.uid.as_str()));

        let layer = Layer::new(layer_id.map(String::from), module_ids, layers);
        let root_layer = root.merge(layer, parent)?;
        let (modules, connections) = self.main.parts();
        ProjectState::new(
            Workflow::new(modules.clone(), connections.clone(), root_layer),
            self.environment.clone(),
        )
    }

    pub fn get_observable(&self, module_id: &str, slot_id: &str) -> Result<Observable<Message>, GraphError> {
        let module = self.module(module_id)?;
        let slot = module.output_slot(slot_id).ok_or_else(|| GraphError::UnknownSlot {
            module_id: module_id.to_string(),
            slot_id: slot_id.to_string(),
            direction: SlotDirection::Output,
        })?;
        Ok(slot.observable())
    }

    pub fn get_input_slot(&self, module_id: &str, slot_id: &str) -> Result<&InputSlot, GraphError> {
        let module = self.module(module_id)?;
        module.input_slot(slot_id).ok_or_else(|| GraphError::UnknownSlot {
            module_id: module_id.to_string(),
            slot_id: slot_id.to_string(),
            direction: SlotDirection::Input,
        })
    }

    fn module(&self, module_id: &str) -> Result<&ModuleInstance, GraphError> {
        let (modules, _) = self.main.parts();
        modules.get(module_id).map(Arc::as_ref).ok_or_else(|| GraphError::UnknownModule {
            module_id: module_id.to_string(),
        })
    }

    /// Build a project from a workflow description: validate it, import its
    /// toolboxes, instantiate its modules, wire its connections (adaptors
    /// are looked up by name) and lay out its layers in declaration order.
    pub async fn from_config(
        config: &WorkflowConfig,
        environment: Arc<dyn Environment>,
        adaptors: &BTreeMap<String, Adaptor>,
    ) -> Result<ProjectState, GraphError> {
        validate_workflow_config(config).map_err(ConfigError::Validation)?;

        for toolbox in &config.toolboxes {
            environment.import(toolbox).await?;
        }

        let mut modules = BTreeMap::new();
        for module in &config.modules {
            let request = InstantiationRequest::new(&module.type_id)
                .with_module_id(&module.id)
                .with_configuration(module.configuration.clone());
            let instance = environment.instantiate_module(request).await?;
            modules.insert(module.id.clone(), Arc::new(instance));
        }

        let mut connections = BTreeMap::new();
        for wire in &config.connections {
            let adaptor = match &wire.adaptor {
                Some(name) => Some(
                    adaptors
                        .get(name)
                        .cloned()
                        .ok_or_else(|| GraphError::UnknownAdaptor { name: name.clone() })?,
                ),
                None => None,
            };
            let mut connection = Connection::new(
                SlotAddress::new(&wire.start.module, &wire.start.slot),
                SlotAddress::new(&wire.end.module, &wire.end.slot),
                adaptor,
            );
            if let Some(id) = &wire.id {
                connection = connection.with_uid(id);
            }
            insert_connection(&mut connections, connection)?;
        }

        let root = Layer::new(
            Some(ROOT_LAYER_ID.to_string()),
            config.modules.iter().map(|m| m.id.clone()).collect(),
            vec![],
        );
        let mut project = ProjectState::new(Workflow::new(modules, connections, root), environment)?;
        for layer in &config.layers {
            let members: Vec<&str> = layer.members.iter().map(String::as_str).collect();
            project = project.add_layer(layer.parent.as_deref(), Some(&layer.id), &members)?;
        }
        Ok(project)
    }
}

/// Connection uids are unique within a workflow.
fn insert_connection(
    connections: &mut BTreeMap<String, Arc<Connection>>,
    connection: Connection,
) -> Result<(), GraphError> {
    if connections.contains_key(connection.uid()) {
        return Err(GraphError::DuplicateConnection {
            connection_id: connection.uid().to_string(),
        });
    }
    connections.insert(connection.uid().to_string(), Arc::new(connection));
    Ok(())
}

impl std::fmt::Debug for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectState").field("main", &self.main).finish()
    }
}
