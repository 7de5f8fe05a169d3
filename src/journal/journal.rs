// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::{Arc, Mutex};

use super::context::Context;
use crate::data::Data;

#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub abstract_: Option<String>,
    pub entry_point: Context,
}

/// Append-with-replace log of diagnostic pages for one module instance (or
/// connection).
///
/// Adding a page whose title already exists drops the previous page, so
/// repeated traffic through the same slot keeps a single, latest trace.
#[derive(Clone, Default)]
pub struct ExecutionJournal {
    pages: Arc<Mutex<Vec<Page>>>,
}

impl ExecutionJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&self, title: impl Into<String>, user_context: Data) -> Context {
        self.add_page_with_abstract(title, None, user_context)
    }

    pub fn add_page_with_abstract(
        &self,
        title: impl Into<String>,
        abstract_: Option<String>,
        user_context: Data,
    ) -> Context {
        let title = title.into();
        let context = Context::new(title.clone(), user_context);
        let mut pages = self.pages.lock().unwrap_or_else(|p| p.into_inner());
        pages.retain(|page| page.title != title);
        pages.push(Page {
            title,
            abstract_,
            entry_point: context.clone(),
        });
        context
    }

    pub fn pages(&self) -> Vec<Page> {
        self.pages.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn page(&self, title: &str) -> Option<Page> {
        self.pages()
            .into_iter()
            .find(|page| page.title == title)
    }

    pub fn len(&self) -> usize {
        self.pages.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ExecutionJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let titles: Vec<String> = self.pages().into_iter().map(|p| p.title).collect();
        f.debug_struct("ExecutionJournal").field("pages", &titles).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_titles_replace_previous_page() {
        let journal = ExecutionJournal::new();
        let first = journal.add_page("Enter slot input$", Data::Null);
        first.info("first message", Data::Null);
        journal.add_page("constructor", Data::Null);
        let second = journal.add_page("Enter slot input$", Data::Null);
        second.info("second message", Data::Null);

        let titles: Vec<String> = journal.pages().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["constructor", "Enter slot input$"]);

        let page = journal.page("Enter slot input$").unwrap();
        assert_eq!(page.entry_point.entries()[0].text, "second message");
    }

    #[test]
    fn clones_share_pages() {
        let journal = ExecutionJournal::new();
        let other = journal.clone();
        other.add_page("p", Data::Null);
        assert_eq!(journal.len(), 1);
    }
}
