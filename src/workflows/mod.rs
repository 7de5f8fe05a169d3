// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph construction.
//!
//! A [`ProjectState`] pairs a [`Workflow`] (modules, connections, layers)
//! with the [`Environment`](crate::traits::Environment) that resolves
//! module types. Construction steps never mutate a state: `add_flows` and
//! `add_layer` return a new one sharing every module and connection they
//! did not touch, and connections are wired as the new state is created.
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use the_flowgraph::data::Data;
//! use the_flowgraph::modules::{InputMessage, Message};
//! use the_flowgraph::toolboxes::LocalEnvironment;
//! use the_flowgraph::workflows::{FlowNode, ProjectState};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! runtime.block_on(async {
//!     let project = ProjectState::empty(Arc::new(LocalEnvironment::builtin()));
//!     project.import("text").await.unwrap();
//!
//!     let upper = project.instantiate("change_text_case", Some("upper"), Data::Null).await.unwrap();
//!     let reverse = project.instantiate("reverse_text", Some("reverse"), Data::Null).await.unwrap();
//!     let project = project
//!         .add_flows(vec![vec![FlowNode::new(upper), FlowNode::new(reverse)]])
//!         .unwrap();
//!
//!     project.get_input_slot("upper", "input$").unwrap().send(InputMessage::new("abc"));
//!     let _subscription = project
//!         .get_observable("reverse", "output$")
//!         .unwrap()
//!         .subscribe(|m: &Message| assert_eq!(m.data, Data::from("CBA")));
//! });
//! ```

mod layer;
mod project;
mod workflow;

#[cfg(test)]
mod integration_tests;

pub use layer::Layer;
pub use project::{FlowNode, ProjectState};
pub use workflow::Workflow;
