// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::status::ExpectationStatus;
use crate::data::{Data, Record};
use crate::journal::Context;

/// Predicate of a leaf expectation.
pub type Predicate = Arc<dyn Fn(&Data) -> bool + Send + Sync>;

/// Maps the raw (leaf) or accumulated (composite) value to the normalized
/// value. Expected to be pure.
pub type Normalizer = Arc<dyn Fn(Data, &Context) -> Data + Send + Sync>;

fn identity() -> Normalizer {
    Arc::new(|data, _| data)
}

/// The closed set of expectation kinds.
#[derive(Clone)]
pub enum ExpectationKind {
    /// Inspects the raw input directly.
    Leaf { when: Predicate, normalize: Normalizer },
    /// First fulfilled child wins; later children stay unresolved.
    AnyOf { children: Vec<Expectation>, normalize: Normalizer },
    /// Every child must be fulfilled; stops at the first rejection.
    AllOf { children: Vec<Expectation>, normalize: Normalizer },
    /// Resolves every child and is always fulfilled.
    OptionalsOf { children: Vec<Expectation>, normalize: Normalizer },
    /// Applies `child` to every element of the input (a non-array input is a
    /// one element array).
    SomeOf {
        child: Expectation,
        count: Option<usize>,
        normalize: Normalizer,
    },
    /// Delegates to `child` on field `name` of the input.
    Attribute {
        name: String,
        child: Expectation,
        normalize: Normalizer,
    },
    /// Named required and optional expectations producing one record.
    Contract(ContractSpec),
    /// Always fulfilled with the input unchanged.
    Free,
}

/// Requirements and optionals of a contract.
///
/// The `AllOf` over requirements and `OptionalsOf` over optionals are built
/// once, at construction, so that repeated resolutions produce equal status
/// trees.
#[derive(Clone)]
pub struct ContractSpec {
    pub requirements: BTreeMap<String, Expectation>,
    pub optionals: BTreeMap<String, Expectation>,
    required: Expectation,
    optional: Expectation,
    normalize: Normalizer,
}

struct ExpectationNode {
    description: String,
    kind: ExpectationKind,
}

/// A composable validator with normalization.
///
/// Immutable and cheap to clone; clones are the same expectation (equality
/// is identity), which is what status trees compare against.
#[derive(Clone)]
pub struct Expectation {
    node: Arc<ExpectationNode>,
}

impl PartialEq for Expectation {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind_name(), self.node.description)
    }
}

impl Expectation {
    fn from_kind(description: impl Into<String>, kind: ExpectationKind) -> Self {
        Self {
            node: Arc::new(ExpectationNode {
                description: description.into(),
                kind,
            }),
        }
    }

    pub fn of<F>(description: impl Into<String>, when: F) -> Self
    where
        F: Fn(&Data) -> bool + Send + Sync + 'static,
    {
        Self::from_kind(
            description,
            ExpectationKind::Leaf {
                when: Arc::new(when),
                normalize: identity(),
            },
        )
    }

    pub fn any_of(description: impl Into<String>, children: Vec<Expectation>) -> Self {
        Self::from_kind(
            description,
            ExpectationKind::AnyOf {
                children,
                normalize: identity(),
            },
        )
    }

    pub fn all_of(description: impl Into<String>, children: Vec<Expectation>) -> Self {
        Self::from_kind(
            description,
            ExpectationKind::AllOf {
                children,
                normalize: identity(),
            },
        )
    }

    pub fn optionals_of(description: impl Into<String>, children: Vec<Expectation>) -> Self {
        Self::from_kind(
            description,
            ExpectationKind::OptionalsOf {
                children,
                normalize: identity(),
            },
        )
    }

    pub fn some_of(description: impl Into<String>, child: Expectation, count: Option<usize>) -> Self {
        Self::from_kind(
            description,
            ExpectationKind::SomeOf {
                child,
                count,
                normalize: identity(),
            },
        )
    }

    pub fn attribute(name: impl Into<String>, child: Expectation) -> Self {
        let name = name.into();
        Self::from_kind(
            format!("expect attribute {}", name),
            ExpectationKind::Attribute {
                name,
                child,
                normalize: identity(),
            },
        )
    }

    pub fn contract<R, O, K1, K2>(description: impl Into<String>, requirements: R, optionals: O) -> Self
    where
        R: IntoIterator<Item = (K1, Expectation)>,
        O: IntoIterator<Item = (K2, Expectation)>,
        K1: Into<String>,
        K2: Into<String>,
    {
        let requirements: BTreeMap<String, Expectation> =
            requirements.into_iter().map(|(k, e)| (k.into(), e)).collect();
        let optionals: BTreeMap<String, Expectation> =
            optionals.into_iter().map(|(k, e)| (k.into(), e)).collect();
        let required = Expectation::all_of("requirements", requirements.values().cloned().collect());
        let optional = Expectation::optionals_of("optionals", optionals.values().cloned().collect());
        Self::from_kind(
            description,
            ExpectationKind::Contract(ContractSpec {
                requirements,
                optionals,
                required,
                optional,
                normalize: identity(),
            }),
        )
    }

    pub fn free() -> Self {
        Self::from_kind("No expectation", ExpectationKind::Free)
    }

    /// Same expectation with a different normalizer. `Free` has no normalizer
    /// and is returned unchanged.
    pub fn normalized_with<F>(self, normalize: F) -> Self
    where
        F: Fn(Data, &Context) -> Data + Send + Sync + 'static,
    {
        let normalize: Normalizer = Arc::new(normalize);
        let kind = match &self.node.kind {
            ExpectationKind::Leaf { when, .. } => ExpectationKind::Leaf {
                when: when.clone(),
                normalize,
            },
            ExpectationKind::AnyOf { children, .. } => ExpectationKind::AnyOf {
                children: children.clone(),
                normalize,
            },
            ExpectationKind::AllOf { children, .. } => ExpectationKind::AllOf {
                children: children.clone(),
                normalize,
            },
            ExpectationKind::OptionalsOf { children, .. } => ExpectationKind::OptionalsOf {
                children: children.clone(),
                normalize,
            },
            ExpectationKind::SomeOf { child, count, .. } => ExpectationKind::SomeOf {
                child: child.clone(),
                count: *count,
                normalize,
            },
            ExpectationKind::Attribute { name, child, .. } => ExpectationKind::Attribute {
                name: name.clone(),
                child: child.clone(),
                normalize,
            },
            ExpectationKind::Contract(spec) => ExpectationKind::Contract(ContractSpec {
                normalize,
                ..spec.clone()
            }),
            ExpectationKind::Free => return self,
        };
        Self::from_kind(self.node.description.clone(), kind)
    }

    pub fn description(&self) -> &str {
        &self.node.description
    }

    pub fn kind(&self) -> &ExpectationKind {
        &self.node.kind
    }

    pub fn kind_name(&self) -> &'static str {
        match self.node.kind {
            ExpectationKind::Leaf { .. } => "Of",
            ExpectationKind::AnyOf { .. } => "AnyOf",
            ExpectationKind::AllOf { .. } => "AllOf",
            ExpectationKind::OptionalsOf { .. } => "OptionalsOf",
            ExpectationKind::SomeOf { .. } => "SomeOf",
            ExpectationKind::Attribute { .. } => "Attribute",
            ExpectationKind::Contract(_) => "Contract",
            ExpectationKind::Free => "Free",
        }
    }

    /// Resolve this expectation against `input`.
    ///
    /// Never fails: a predicate that does not apply to the input's shape
    /// simply does not hold, and the expectation is rejected.
    pub fn resolve(&self, input: &Data, context: &Context) -> ExpectationStatus {
        match &self.node.kind {
            ExpectationKind::Leaf { when, normalize } => {
                if when(input) {
                    ExpectationStatus::fulfilled(self, normalize(input.clone(), context), input, Vec::new())
                } else {
                    ExpectationStatus::rejected(self, input, Vec::new())
                }
            }
            ExpectationKind::AnyOf { children, normalize } => {
                let mut statuses = Vec::with_capacity(children.len());
                let mut found: Option<Data> = None;
                for child in children {
                    if found.is_some() {
                        statuses.push(ExpectationStatus::unresolved(child, input));
                        continue;
                    }
                    let status = child.resolve(input, context);
                    found = status.value().cloned();
                    statuses.push(status);
                }
                match found {
                    Some(value) => ExpectationStatus::fulfilled(self, normalize(value, context), input, statuses),
                    None => ExpectationStatus::rejected(self, input, statuses),
                }
            }
            ExpectationKind::AllOf { children, normalize } => {
                let (statuses, values) = resolve_all(children, input, context);
                match values {
                    Some(values) => {
                        ExpectationStatus::fulfilled(self, normalize(Data::Array(values), context), input, statuses)
                    }
                    None => ExpectationStatus::rejected(self, input, statuses),
                }
            }
            ExpectationKind::OptionalsOf { children, normalize } => {
                let statuses: Vec<ExpectationStatus> =
                    children.iter().map(|child| child.resolve(input, context)).collect();
                let values = statuses
                    .iter()
                    .map(|status| status.value().cloned().unwrap_or(Data::Null))
                    .collect();
                ExpectationStatus::fulfilled(self, normalize(Data::Array(values), context), input, statuses)
            }
            ExpectationKind::SomeOf { child, count, normalize } => {
                let elements: Vec<Data> = match input {
                    Data::Array(items) => items.clone(),
                    other => vec![other.clone()],
                };
                let statuses: Vec<ExpectationStatus> =
                    elements.iter().map(|element| child.resolve(element, context)).collect();
                let matched: Vec<Data> = statuses.iter().filter_map(|s| s.value().cloned()).collect();
                let count_ok = count.map_or(true, |expected| matched.len() == expected);
                if matched.is_empty() || !count_ok {
                    ExpectationStatus::rejected(self, input, statuses)
                } else {
                    ExpectationStatus::fulfilled(self, normalize(Data::Array(matched), context), input, statuses)
                }
            }
            ExpectationKind::Attribute { name, child, normalize } => match input.field(name) {
                None => ExpectationStatus::rejected(self, input, Vec::new()),
                Some(field) => {
                    let status = child.resolve(field, context);
                    match status.value().cloned() {
                        Some(value) => {
                            ExpectationStatus::fulfilled(self, normalize(value, context), input, vec![status])
                        }
                        None => ExpectationStatus::rejected(self, input, vec![status]),
                    }
                }
            },
            ExpectationKind::Contract(spec) => resolve_contract(self, spec, input, context),
            ExpectationKind::Free => ExpectationStatus::fulfilled(self, input.clone(), input, Vec::new()),
        }
    }
}

/// Resolve children left to right, stopping at the first rejection. Returns
/// every child status (skipped ones `Unresolved`) and, when all were
/// fulfilled, their values in order.
fn resolve_all(
    children: &[Expectation],
    input: &Data,
    context: &Context,
) -> (Vec<ExpectationStatus>, Option<Vec<Data>>) {
    let mut statuses = Vec::with_capacity(children.len());
    let mut values = Some(Vec::with_capacity(children.len()));
    for child in children {
        if values.is_none() {
            statuses.push(ExpectationStatus::unresolved(child, input));
            continue;
        }
        let status = child.resolve(input, context);
        match (status.value(), values.as_mut()) {
            (Some(value), Some(acc)) => acc.push(value.clone()),
            _ => values = None,
        }
        statuses.push(status);
    }
    (statuses, values)
}

fn resolve_contract(
    expectation: &Expectation,
    spec: &ContractSpec,
    input: &Data,
    context: &Context,
) -> ExpectationStatus {
    let required = spec.required.resolve(input, context);
    let optional = spec.optional.resolve(input, context);

    let optional_values = optional.value().and_then(Data::as_array).unwrap_or(&[]);
    let mut record = Record::new();
    for (i, key) in spec.optionals.keys().enumerate() {
        record.insert(key.clone(), optional_values.get(i).cloned().unwrap_or(Data::Null));
    }

    let required_values = required.value().and_then(Data::as_array).map(<[Data]>::to_vec);
    let children = vec![required, optional];
    match required_values {
        Some(values) => {
            for (key, value) in spec.requirements.keys().zip(values) {
                record.insert(key.clone(), value);
            }
            ExpectationStatus::fulfilled(
                expectation,
                (spec.normalize)(Data::Record(record), context),
                input,
                children,
            )
        }
        None => ExpectationStatus::rejected(expectation, input, children),
    }
}

