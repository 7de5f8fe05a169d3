// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-message diagnostic contexts and the per-instance execution journal.

mod context;
#[allow(clippy::module_inception)]
mod journal;

pub use context::{Context, LogEntry, LogLevel};
pub use journal::{ExecutionJournal, Page};
