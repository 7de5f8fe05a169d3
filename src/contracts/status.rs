// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::expectation::Expectation;
use crate::data::Data;

/// Outcome of resolving one expectation against one value.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Carries the normalized value.
    Fulfilled(Data),
    Rejected,
    /// Skipped because a combinator short-circuited before reaching it.
    Unresolved,
}

impl Resolution {
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Fulfilled(_) => "fulfilled",
            Resolution::Rejected => "rejected",
            Resolution::Unresolved => "unresolved",
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Resolution::Fulfilled(_))
    }
}

/// Result tree of a resolution.
///
/// Mirrors the expectation tree: composite expectations record the status of
/// each child, in order, including children that were never evaluated
/// (`Unresolved`), so a report shows exactly how deep evaluation went.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationStatus {
    pub expectation: Expectation,
    pub resolution: Resolution,
    pub from_value: Data,
    pub children: Vec<ExpectationStatus>,
}

impl ExpectationStatus {
    pub(crate) fn fulfilled(
        expectation: &Expectation,
        value: Data,
        from_value: &Data,
        children: Vec<ExpectationStatus>,
    ) -> Self {
        Self {
            expectation: expectation.clone(),
            resolution: Resolution::Fulfilled(value),
            from_value: from_value.clone(),
            children,
        }
    }

    pub(crate) fn rejected(
        expectation: &Expectation,
        from_value: &Data,
        children: Vec<ExpectationStatus>,
    ) -> Self {
        Self {
            expectation: expectation.clone(),
            resolution: Resolution::Rejected,
            from_value: from_value.clone(),
            children,
        }
    }

    pub(crate) fn unresolved(expectation: &Expectation, from_value: &Data) -> Self {
        Self {
            expectation: expectation.clone(),
            resolution: Resolution::Unresolved,
            from_value: from_value.clone(),
            children: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.resolution, Resolution::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.resolution, Resolution::Rejected)
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.resolution, Resolution::Unresolved)
    }

    /// The normalized value, if fulfilled.
    pub fn value(&self) -> Option<&Data> {
        match &self.resolution {
            Resolution::Fulfilled(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Data> {
        match self.resolution {
            Resolution::Fulfilled(value) => Some(value),
            _ => None,
        }
    }

    /// Number of rejected nodes in the whole tree, this one included.
    pub fn rejected_count(&self) -> usize {
        usize::from(self.is_rejected())
            + self
                .children
                .iter()
                .map(ExpectationStatus::rejected_count)
                .sum::<usize>()
    }

    /// Render the tree as a record `{description, status, children}` for
    /// journals and views.
    pub fn report(&self) -> Data {
        Data::record([
            ("description", Data::from(self.expectation.description())),
            ("status", Data::from(self.resolution.label())),
            ("from", Data::from(self.from_value.kind())),
            (
                "children",
                Data::Array(self.children.iter().map(ExpectationStatus::report).collect()),
            ),
        ])
    }
}
