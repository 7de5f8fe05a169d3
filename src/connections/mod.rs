// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Wires between an output slot of one module and an input slot of another.

mod connection;

pub use connection::{Adaptor, Connection, ConnectionStatus, SlotAddress};
