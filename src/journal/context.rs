// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::data::Data;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub text: String,
    pub data: Data,
}

struct ContextInner {
    title: String,
    user_context: Data,
    started: Instant,
    entries: Mutex<Vec<LogEntry>>,
    children: Mutex<Vec<Context>>,
    elapsed: Mutex<Option<Duration>>,
}

/// A diagnostic page: a titled node collecting log entries and child
/// contexts while a message is processed.
///
/// `Context` is a cheap handle; clones share the same page. The
/// `user_context` is the record supplied by whoever sent the message and is
/// the only part of a context allowed to cross a module boundary.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Context {
    pub fn new(title: impl Into<String>, user_context: Data) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                title: title.into(),
                user_context,
                started: Instant::now(),
                entries: Mutex::new(Vec::new()),
                children: Mutex::new(Vec::new()),
                elapsed: Mutex::new(None),
            }),
        }
    }

    /// A context with no user data, handy for tests and one-off resolutions.
    pub fn detached(title: impl Into<String>) -> Self {
        Self::new(title, Data::empty_record())
    }

    pub fn title(&self) -> &str {
        &self.inner.title
    }

    pub fn user_context(&self) -> &Data {
        &self.inner.user_context
    }

    pub fn info(&self, text: impl Into<String>, data: impl Into<Data>) {
        self.push(LogLevel::Info, text.into(), data.into());
    }

    pub fn warning(&self, text: impl Into<String>, data: impl Into<Data>) {
        self.push(LogLevel::Warning, text.into(), data.into());
    }

    pub fn error(&self, text: impl Into<String>, data: impl Into<Data>) {
        self.push(LogLevel::Error, text.into(), data.into());
    }

    fn push(&self, level: LogLevel, text: String, data: Data) {
        let page = self.title();
        match level {
            LogLevel::Info => tracing::debug!(page, "{}", text),
            LogLevel::Warning => tracing::warn!(page, "{}", text),
            LogLevel::Error => tracing::error!(page, "{}", text),
        }
        lock(&self.inner.entries).push(LogEntry { level, text, data });
    }

    /// Open a child page. The child inherits the user context.
    pub fn child(&self, title: impl Into<String>) -> Context {
        let child = Context::new(title, self.inner.user_context.clone());
        lock(&self.inner.children).push(child.clone());
        child
    }

    /// Run `f` inside a child page, ending the page once `f` returns.
    pub fn with_child<R>(&self, title: impl Into<String>, f: impl FnOnce(&Context) -> R) -> R {
        let child = self.child(title);
        let result = f(&child);
        child.end();
        result
    }

    pub fn end(&self) {
        let mut elapsed = lock(&self.inner.elapsed);
        if elapsed.is_none() {
            *elapsed = Some(self.inner.started.elapsed());
        }
    }

    pub fn is_ended(&self) -> bool {
        lock(&self.inner.elapsed).is_some()
    }

    pub fn elapsed(&self) -> Option<Duration> {
        *lock(&self.inner.elapsed)
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        lock(&self.inner.entries).clone()
    }

    pub fn children(&self) -> Vec<Context> {
        lock(&self.inner.children).clone()
    }

    pub fn has_errors(&self) -> bool {
        lock(&self.inner.entries)
            .iter()
            .any(|entry| entry.level == LogLevel::Error)
            || self.children().iter().any(Context::has_errors)
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("title", &self.inner.title)
            .field("entries", &lock(&self.inner.entries).len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_inherits_user_context_and_errors_bubble_up() {
        let root = Context::new("root", Data::record([("user", "alice")]));
        root.with_child("step", |ctx| {
            assert_eq!(ctx.user_context().get("user"), Some(&Data::from("alice")));
            ctx.error("boom", Data::Null);
        });
        assert!(root.has_errors());
        assert_eq!(root.children().len(), 1);
        assert!(root.children()[0].is_ended());
    }

    #[test]
    fn end_is_idempotent() {
        let ctx = Context::detached("page");
        ctx.end();
        let first = ctx.elapsed();
        ctx.end();
        assert_eq!(ctx.elapsed(), first);
    }
}
