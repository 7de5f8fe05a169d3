// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::instance::ModuleInstance;
use super::messages::{OutputMessage, ProcessingMessage};
use crate::config::ConfigurationModel;
use crate::contracts::{no_contract, Expectation};
use crate::data::Data;
use crate::errors::GraphError;
use crate::journal::Context;
use crate::streams::Observable;
use crate::traits::ModuleFactory;

/// Static description of a module type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Declaration {
    pub type_id: String,
    pub dependencies: Vec<String>,
    pub tags: Vec<String>,
    pub description: String,
}

impl Declaration {
    pub fn new(type_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

/// A declared input: what it expects and how it normalizes.
#[derive(Debug, Clone)]
pub struct Input {
    pub description: String,
    pub contract: Expectation,
}

impl Input {
    /// An input accepting anything as is.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            contract: no_contract(),
        }
    }

    pub fn with_contract(mut self, contract: Expectation) -> Self {
        self.contract = contract;
        self
    }
}

/// What a module's output logic receives, once, when the instance is built.
pub struct GeneratorArgs {
    pub inputs: BTreeMap<String, Observable<ProcessingMessage>>,
    pub configuration: Data,
    pub context: Context,
}

impl GeneratorArgs {
    /// Prepared stream of an input slot; empty if the module has no such
    /// input.
    pub fn input(&self, slot_id: &str) -> Observable<ProcessingMessage> {
        self.inputs.get(slot_id).cloned().unwrap_or_else(Observable::empty)
    }
}

pub type OutputGenerator =
    Box<dyn FnOnce(GeneratorArgs) -> Vec<(String, Observable<OutputMessage>)> + Send>;

/// Everything needed to build a module instance.
pub struct ModuleDefinition {
    pub configuration: ConfigurationModel,
    /// Inputs in declaration order.
    pub inputs: Vec<(String, Input)>,
    pub outputs: OutputGenerator,
}

/// Parameters forwarded from the environment to a module implementation.
#[derive(Debug, Clone, Default)]
pub struct ForwardArgs {
    /// Instance uid; a random one is generated when absent.
    pub uid: Option<String>,
    /// Static configuration overrides.
    pub configuration: Data,
}

pub type Implementation = Arc<dyn Fn(&ForwardArgs) -> ModuleDefinition + Send + Sync>;

/// A module type: its declaration plus the implementation building each
/// instance's definition.
#[derive(Clone)]
pub struct Module {
    declaration: Declaration,
    implementation: Implementation,
}

impl Module {
    pub fn new<F>(declaration: Declaration, implementation: F) -> Self
    where
        F: Fn(&ForwardArgs) -> ModuleDefinition + Send + Sync + 'static,
    {
        Self {
            declaration,
            implementation: Arc::new(implementation),
        }
    }

    /// Build an instance synchronously.
    pub fn build(&self, args: ForwardArgs) -> ModuleInstance {
        let definition = (self.implementation)(&args);
        ModuleInstance::new(&self.declaration.type_id, definition, args)
    }
}

#[async_trait]
impl ModuleFactory for Module {
    fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    async fn instantiate(&self, args: ForwardArgs) -> Result<ModuleInstance, GraphError> {
        Ok(self.build(args))
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("declaration", &self.declaration)
            .finish()
    }
}
