// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;      // workflow descriptions + configuration models
pub mod connections; // output -> input wiring
pub mod contracts;   // expectation trees
pub mod data;        // dynamic values
pub mod errors;      // error handling
pub mod journal;     // diagnostic pages
pub mod modules;     // declarations, instances, slots
pub mod observability;
pub mod streams;     // push streams
pub mod toolboxes;   // module catalogs + local environment
pub mod traits;      // unified abstractions
pub mod workflows;   // graph construction
