// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod environment;
pub mod module_factory;

pub use environment::{Environment, InstantiationRequest};
pub use module_factory::ModuleFactory;
