// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

use super::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDirection {
    Input,
    Output,
}

impl fmt::Display for SlotDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotDirection::Input => write!(f, "input"),
            SlotDirection::Output => write!(f, "output"),
        }
    }
}

/// Failures of graph construction. These are the only errors that reach the
/// caller; contract rejections are recorded in journals instead.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Unknown module type '{type_id}'")]
    UnknownModuleType { type_id: String },

    #[error("Unknown toolbox '{name}'")]
    UnknownToolbox { name: String },

    #[error("No module '{module_id}' in the workflow")]
    UnknownModule { module_id: String },

    #[error("Module '{module_id}' has no {direction} slot '{slot_id}'")]
    UnknownSlot {
        module_id: String,
        slot_id: String,
        direction: SlotDirection,
    },

    /// A flow used a module without naming a slot and the module has none.
    #[error("Module '{module_id}' has no {direction} slot")]
    MissingSlot {
        module_id: String,
        direction: SlotDirection,
    },

    /// Two connections of one workflow share a uid.
    #[error("Connection '{connection_id}' is already in the workflow")]
    DuplicateConnection { connection_id: String },

    #[error("No layer '{layer_id}' in the workflow")]
    UnknownLayer { layer_id: String },

    /// A layer would end up nested inside itself.
    #[error("Layer '{layer_id}' cannot be nested inside itself")]
    LayerCycle { layer_id: String },

    #[error("Unknown adaptor '{name}'")]
    UnknownAdaptor { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
