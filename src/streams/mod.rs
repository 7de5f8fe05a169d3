// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Minimal synchronous push streams.
//!
//! Messages travel between modules by synchronous propagation: a `next` on a
//! [`Subject`] runs every downstream observer before it returns. All types are
//! `Send + Sync` so producers living in tokio tasks can feed a subject.

mod observable;
mod subject;
mod subscription;

pub use observable::{Observable, Subscriber};
pub use subject::Subject;
pub use subscription::Subscription;
