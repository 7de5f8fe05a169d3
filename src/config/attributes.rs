// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed leaves of a configuration schema.

use std::collections::BTreeMap;

use crate::data::Data;
use crate::observability::messages::contract::ConfigurationOverrideOutOfBounds;
use crate::observability::messages::StructuredLog;

/// Numeric payloads that can carry bounds.
pub trait Numeric: Copy {
    fn to_f64(self) -> f64;
}

impl Numeric for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

impl Numeric for i64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// A default value, plus optional bounds for numeric payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<T> {
    pub value: T,
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Attribute<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            min: None,
            max: None,
        }
    }
}

impl<T: Numeric> Attribute<T> {
    pub fn with_min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }

    fn out_of_bounds(&self, candidate: f64) -> bool {
        self.min.map_or(false, |min| candidate < min.to_f64())
            || self.max.map_or(false, |max| candidate > max.to_f64())
    }
}

impl Attribute<f64> {
    pub fn float(value: f64) -> Self {
        Self::new(value)
    }
}

impl Attribute<i64> {
    pub fn integer(value: i64) -> Self {
        Self::new(value)
    }
}

impl Attribute<String> {
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(value.into())
    }
}

impl Attribute<bool> {
    pub fn boolean(value: bool) -> Self {
        Self::new(value)
    }
}

impl Attribute<Data> {
    /// Arbitrary value, including opaque instances such as callables.
    pub fn any(value: impl Into<Data>) -> Self {
        Self::new(value.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Float(Attribute<f64>),
    Integer(Attribute<i64>),
    Text(Attribute<String>),
    Boolean(Attribute<bool>),
    Any(Attribute<Data>),
}

impl Leaf {
    pub fn default_value(&self) -> Data {
        match self {
            Leaf::Float(a) => Data::Number(a.value),
            Leaf::Integer(a) => Data::from(a.value),
            Leaf::Text(a) => Data::Text(a.value.clone()),
            Leaf::Boolean(a) => Data::Bool(a.value),
            Leaf::Any(a) => a.value.clone(),
        }
    }

    /// The value this leaf takes under `candidate`. Overrides are used as
    /// given; an out-of-bounds numeric override is only reported.
    pub(crate) fn resolve(&self, key: &str, candidate: Option<&Data>) -> Data {
        let Some(candidate) = candidate else {
            return self.default_value();
        };
        if let Some(number) = candidate.as_f64() {
            let (violated, min, max) = match self {
                Leaf::Float(a) => (a.out_of_bounds(number), a.min, a.max),
                Leaf::Integer(a) => (
                    a.out_of_bounds(number),
                    a.min.map(Numeric::to_f64),
                    a.max.map(Numeric::to_f64),
                ),
                _ => (false, None, None),
            };
            if violated {
                ConfigurationOverrideOutOfBounds {
                    attribute: key,
                    value: number,
                    min,
                    max,
                }
                .log();
            }
        }
        candidate.clone()
    }
}

/// Shape of a configuration: leaves are attributes, nodes are named
/// sub-schemas.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Leaf(Leaf),
    Node(BTreeMap<String, Schema>),
}

impl Schema {
    pub fn node<K, S, I>(entries: I) -> Self
    where
        K: Into<String>,
        S: Into<Schema>,
        I: IntoIterator<Item = (K, S)>,
    {
        Schema::Node(
            entries
                .into_iter()
                .map(|(k, s)| (k.into(), s.into()))
                .collect(),
        )
    }
}

impl From<Leaf> for Schema {
    fn from(leaf: Leaf) -> Self {
        Schema::Leaf(leaf)
    }
}

impl From<Attribute<f64>> for Schema {
    fn from(a: Attribute<f64>) -> Self {
        Schema::Leaf(Leaf::Float(a))
    }
}

impl From<Attribute<i64>> for Schema {
    fn from(a: Attribute<i64>) -> Self {
        Schema::Leaf(Leaf::Integer(a))
    }
}

impl From<Attribute<String>> for Schema {
    fn from(a: Attribute<String>) -> Self {
        Schema::Leaf(Leaf::Text(a))
    }
}

impl From<Attribute<bool>> for Schema {
    fn from(a: Attribute<bool>) -> Self {
        Schema::Leaf(Leaf::Boolean(a))
    }
}

impl From<Attribute<Data>> for Schema {
    fn from(a: Attribute<Data>) -> Self {
        Schema::Leaf(Leaf::Any(a))
    }
}
