// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type Teardown = Box<dyn FnOnce() + Send>;

struct SubscriptionInner {
    closed: AtomicBool,
    teardowns: Mutex<Vec<Teardown>>,
}

/// Handle on a live subscription. Clones share the same subscription;
/// `unsubscribe` runs every registered teardown exactly once.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscription {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SubscriptionInner {
                closed: AtomicBool::new(false),
                teardowns: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn from_teardown(teardown: impl FnOnce() + Send + 'static) -> Self {
        let subscription = Self::new();
        subscription.add(teardown);
        subscription
    }

    /// An already closed subscription, for sources that complete while
    /// being subscribed.
    pub fn closed() -> Self {
        let subscription = Self::new();
        subscription.inner.closed.store(true, Ordering::SeqCst);
        subscription
    }

    /// Register a teardown. Runs immediately if already unsubscribed.
    pub fn add(&self, teardown: impl FnOnce() + Send + 'static) {
        if self.is_closed() {
            teardown();
            return;
        }
        let mut teardowns = self
            .inner
            .teardowns
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        teardowns.push(Box::new(teardown));
    }

    /// Tie another subscription's lifetime to this one.
    pub fn add_subscription(&self, other: Subscription) {
        self.add(move || other.unsubscribe());
    }

    pub fn unsubscribe(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let teardowns: Vec<Teardown> = {
            let mut guard = self
                .inner
                .teardowns
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            guard.drain(..).collect()
        };
        for teardown in teardowns {
            teardown();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}
