// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Module type catalogs and the in-process environment resolving them.

mod registry;
pub mod reactive;
pub mod text;

pub use registry::{LocalEnvironment, ModuleRegistry, ToolBox};
