// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural validation of workflow descriptions.
//!
//! # Validation Pipeline
//!
//! 1. **Module checks**: ids are unique and every module names a type
//! 2. **Reference checks**: connection ids are unique, connections and layers
//!    only name declared modules
//!    (or, for layers, other declared layers)
//! 3. **Feedback loops**: DFS over the module graph
//!
//! Errors from the first two stages are accumulated and returned together.
//! Feedback loops are legal in a push-based flow and are only logged as
//! warnings; loop detection runs only on a graph whose references resolved.
//!
//! # Example
//! ```rust
//! use the_flowgraph::config::{validate_workflow_config, WorkflowConfig};
//! use the_flowgraph::errors::ValidationError;
//!
//! let config: WorkflowConfig = serde_yaml::from_str(r#"
//! modules:
//!   - id: upper
//!     type_id: change_text_case
//!   - id: upper
//!     type_id: reverse_text
//! "#).unwrap();
//!
//! let errors = validate_workflow_config(&config).unwrap_err();
//! assert_eq!(errors, vec![ValidationError::DuplicateModuleId { module_id: "upper".into() }]);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::config::{ConnectionConfig, WorkflowConfig};
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    DuplicateConnectionId, DuplicateModuleId, FeedbackLoopDetected, UnresolvedModule,
};
use crate::observability::messages::StructuredLog;

/// Validate a workflow description, returning every problem found.
pub fn validate_workflow_config(config: &WorkflowConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    errors.extend(validate_modules(config));
    errors.extend(validate_connection_references(config));
    errors.extend(validate_layers(config));

    if errors.is_empty() {
        for cycle in detect_feedback_loops(config) {
            let cycle: Vec<&str> = cycle.iter().map(String::as_str).collect();
            FeedbackLoopDetected { cycle: &cycle }.log();
        }
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_modules(config: &WorkflowConfig) -> Vec<ValidationError> {
    let mut seen_ids = HashSet::new();
    let mut errors = Vec::new();

    for module in &config.modules {
        if !seen_ids.insert(&module.id) {
            DuplicateModuleId {
                module_id: &module.id,
            }
            .log();
            errors.push(ValidationError::DuplicateModuleId {
                module_id: module.id.clone(),
            });
        }
        if module.type_id.trim().is_empty() {
            errors.push(ValidationError::EmptyTypeId {
                module_id: module.id.clone(),
            });
        }
    }

    errors
}

/// Id a connection is known by in diagnostics.
fn connection_label(connection: &ConnectionConfig) -> String {
    connection.id.clone().unwrap_or_else(|| {
        format!(
            "{}@{}-{}@{}",
            connection.start.slot, connection.start.module, connection.end.slot, connection.end.module
        )
    })
}

fn validate_connection_references(config: &WorkflowConfig) -> Vec<ValidationError> {
    let module_ids: HashSet<&String> = config.modules.iter().map(|m| &m.id).collect();
    let mut labels = HashSet::new();
    let mut errors = Vec::new();

    for connection in &config.connections {
        let label = connection_label(connection);
        if !labels.insert(label.clone()) {
            DuplicateConnectionId {
                connection_id: &label,
            }
            .log();
            errors.push(ValidationError::DuplicateConnectionId {
                connection_id: label.clone(),
            });
        }
        for module_id in [&connection.start.module, &connection.end.module] {
            if !module_ids.contains(module_id) {
                UnresolvedModule {
                    referenced_by: &label,
                    module_id,
                }
                .log();
                errors.push(ValidationError::UnresolvedModule {
                    referenced_by: label.clone(),
                    module_id: module_id.clone(),
                });
            }
        }
    }

    errors
}

fn validate_layers(config: &WorkflowConfig) -> Vec<ValidationError> {
    let module_ids: HashSet<&String> = config.modules.iter().map(|m| &m.id).collect();
    let mut layer_ids = HashSet::new();
    let mut errors = Vec::new();

    for layer in &config.layers {
        if !layer_ids.insert(&layer.id) {
            errors.push(ValidationError::DuplicateLayerId {
                layer_id: layer.id.clone(),
            });
        }
    }

    for layer in &config.layers {
        if let Some(parent) = &layer.parent {
            if !layer_ids.contains(parent) {
                errors.push(ValidationError::UnknownParentLayer {
                    layer_id: layer.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
        for member in &layer.members {
            if !module_ids.contains(member) && !layer_ids.contains(member) {
                errors.push(ValidationError::UnknownLayerMember {
                    layer_id: layer.id.clone(),
                    member: member.clone(),
                });
            }
        }
    }

    errors
}

/// Find feedback loops in the module graph, one cycle per back edge found
/// by a depth-first traversal in module id order.
///
/// Each cycle is reported as a path closing on its first module, e.g.
/// `["a", "b", "a"]`. Connections naming undeclared modules are ignored.
pub fn detect_feedback_loops(config: &WorkflowConfig) -> Vec<Vec<String>> {
    let mut graph: BTreeMap<&str, BTreeSet<&str>> = config
        .modules
        .iter()
        .map(|m| (m.id.as_str(), BTreeSet::new()))
        .collect();

    for connection in &config.connections {
        let end = connection.end.module.as_str();
        if !graph.contains_key(end) {
            continue;
        }
        if let Some(targets) = graph.get_mut(connection.start.module.as_str()) {
            targets.insert(end);
        }
    }

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();
    let mut cycles = Vec::new();

    for &module_id in graph.keys() {
        if !visited.contains(module_id) {
            dfs_collect_cycles(module_id, &graph, &mut visited, &mut rec_stack, &mut path, &mut cycles);
        }
    }

    cycles
}

/// DFS with a recursion stack: reaching a node that is still on the stack
/// closes a cycle, which is the path segment from that node onward.
fn dfs_collect_cycles<'a>(
    node: &'a str,
    graph: &BTreeMap<&'a str, BTreeSet<&'a str>>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(neighbors) = graph.get(node) {
        for &neighbor in neighbors {
            if !visited.contains(neighbor) {
                dfs_collect_cycles(neighbor, graph, visited, rec_stack, path, cycles);
            } else if rec_stack.contains(neighbor) {
                if let Some(cycle_start) = path.iter().position(|&x| x == neighbor) {
                    let mut cycle: Vec<String> = path[cycle_start..].iter().map(|s| s.to_string()).collect();
                    cycle.push(neighbor.to_string());
                    cycles.push(cycle);
                }
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
}
