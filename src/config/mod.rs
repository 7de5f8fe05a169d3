// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod attributes;
mod loader;
mod model;
mod validation;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use attributes::{Attribute, Leaf, Numeric, Schema};
pub use loader::{
    load_and_validate_config, load_config, ConnectionConfig, LayerConfig, ModuleConfig, SlotRef,
    WorkflowConfig,
};
pub use model::ConfigurationModel;
pub use validation::{detect_feedback_loops, validate_workflow_config};
