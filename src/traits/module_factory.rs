// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::GraphError;
use crate::modules::{Declaration, ForwardArgs, ModuleInstance};

/// Builds instances of one module type.
#[async_trait]
pub trait ModuleFactory: Send + Sync {
    fn declaration(&self) -> &Declaration;

    async fn instantiate(&self, args: ForwardArgs) -> Result<ModuleInstance, GraphError>;

    fn type_id(&self) -> &str {
        &self.declaration().type_id
    }
}
