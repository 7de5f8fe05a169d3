// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while loading or validating a workflow description.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a file into a [`WorkflowConfig`](crate::config::WorkflowConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML workflow: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML workflow: {0}")]
    Toml(#[from] toml::de::Error),

    /// The extension is neither `.yaml`/`.yml` nor `.toml`.
    #[error("Unsupported workflow format: '{path}'")]
    UnsupportedFormat { path: PathBuf },

    #[error("Workflow validation failed:\n{}", render(.0))]
    Validation(Vec<ValidationError>),
}

fn render(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Structural problems in a workflow description. Validation reports all of
/// them at once.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate module ID: '{module_id}'")]
    DuplicateModuleId { module_id: String },

    /// A connection or layer names a module that is not declared.
    #[error("'{referenced_by}' references module '{module_id}' which does not exist")]
    UnresolvedModule {
        referenced_by: String,
        module_id: String,
    },

    #[error("Duplicate connection ID: '{connection_id}'")]
    DuplicateConnectionId { connection_id: String },

    #[error("Duplicate layer ID: '{layer_id}'")]
    DuplicateLayerId { layer_id: String },

    /// A layer member is neither a declared module nor another layer.
    #[error("Layer '{layer_id}' lists unknown member '{member}'")]
    UnknownLayerMember { layer_id: String, member: String },

    #[error("Layer '{layer_id}' has unknown parent '{parent}'")]
    UnknownParentLayer { layer_id: String, parent: String },

    #[error("Module '{module_id}' has an empty type_id")]
    EmptyTypeId { module_id: String },
}
