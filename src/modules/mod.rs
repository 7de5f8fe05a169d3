// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Modules, their instances, and the slots messages flow through.

mod declaration;
mod instance;
mod messages;
mod slots;

pub use declaration::{
    Declaration, ForwardArgs, GeneratorArgs, Implementation, Input, Module, ModuleDefinition,
    OutputGenerator,
};
pub use instance::ModuleInstance;
pub use messages::{InputMessage, Message, OutputMessage, ProcessingMessage};
pub use slots::{InputSlot, OutputSlot, SlotState};
