// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dynamic in-memory values flowing between modules.
//!
//! `Data` is the payload type for messages, normalized contract values and
//! configuration trees. `Null` stands for an absent value. `Instance` carries
//! an arbitrary Rust value behind an `Arc<dyn Any>` so that contracts can ask
//! "is this an instance of `T`?" without serializing anything.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub type Record = BTreeMap<String, Data>;

/// An opaque, shareable Rust value. Two instances are equal only if they
/// point to the same allocation.
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<instance {}>", self.type_name)
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum Data {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Array(Vec<Data>),
    Record(Record),
    Instance(Instance),
}

impl Data {
    pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
        Data::Instance(Instance::new(value))
    }

    /// Build a record from `(key, value)` pairs.
    pub fn record<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Data>,
        I: IntoIterator<Item = (K, V)>,
    {
        Data::Record(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn empty_record() -> Self {
        Data::Record(Record::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Data::Null)
    }

    /// Field lookup on records. Non-record values have no fields.
    pub fn get(&self, key: &str) -> Option<&Data> {
        match self {
            Data::Record(map) => map.get(key),
            _ => None,
        }
    }

    /// Field lookup that treats a `Null` field the same as a missing one.
    pub fn field(&self, key: &str) -> Option<&Data> {
        self.get(key).filter(|value| !value.is_null())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Data::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Data::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Data::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Data::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Data]> {
        match self {
            Data::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Data::Record(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Data::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn is_instance_of<T: Any>(&self) -> bool {
        self.as_instance().map(Instance::is::<T>).unwrap_or(false)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_instance().and_then(Instance::downcast_ref::<T>)
    }

    /// Shallow merge: keys of `overlay` win over keys of `self`. Non-record
    /// operands contribute nothing.
    pub fn merged_with(&self, overlay: &Data) -> Data {
        let mut merged = self.as_record().cloned().unwrap_or_default();
        if let Some(top) = overlay.as_record() {
            for (key, value) in top {
                merged.insert(key.clone(), value.clone());
            }
        }
        Data::Record(merged)
    }

    /// Short human readable type label, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Data::Null => "null",
            Data::Bool(_) => "bool",
            Data::Number(_) => "number",
            Data::Text(_) => "text",
            Data::Array(_) => "array",
            Data::Record(_) => "record",
            Data::Instance(_) => "instance",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Data::Null => serde_json::Value::Null,
            Data::Bool(b) => serde_json::Value::Bool(*b),
            Data::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Data::Text(s) => serde_json::Value::String(s.clone()),
            Data::Array(items) => serde_json::Value::Array(items.iter().map(Data::to_json).collect()),
            Data::Record(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Data::Instance(instance) => serde_json::Value::String(format!("{:?}", instance)),
        }
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Text(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<serde_json::Value> for Data {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Data::Null,
            serde_json::Value::Bool(b) => Data::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(Data::Number).unwrap_or(Data::Null),
            serde_json::Value::String(s) => Data::Text(s),
            serde_json::Value::Array(items) => Data::Array(items.into_iter().map(Data::from).collect()),
            serde_json::Value::Object(map) => {
                Data::Record(map.into_iter().map(|(k, v)| (k, Data::from(v))).collect())
            }
        }
    }
}

impl Serialize for Data {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Data {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Data::from)
    }
}

impl From<bool> for Data {
    fn from(value: bool) -> Self {
        Data::Bool(value)
    }
}

impl From<f64> for Data {
    fn from(value: f64) -> Self {
        Data::Number(value)
    }
}

impl From<i64> for Data {
    fn from(value: i64) -> Self {
        Data::Number(value as f64)
    }
}

impl From<i32> for Data {
    fn from(value: i32) -> Self {
        Data::Number(value as f64)
    }
}

impl From<usize> for Data {
    fn from(value: usize) -> Self {
        Data::Number(value as f64)
    }
}

impl From<&str> for Data {
    fn from(value: &str) -> Self {
        Data::Text(value.to_string())
    }
}

impl From<String> for Data {
    fn from(value: String) -> Self {
        Data::Text(value)
    }
}

impl From<Vec<Data>> for Data {
    fn from(value: Vec<Data>) -> Self {
        Data::Array(value)
    }
}

impl From<Record> for Data {
    fn from(value: Record) -> Self {
        Data::Record(value)
    }
}

impl From<Instance> for Data {
    fn from(value: Instance) -> Self {
        Data::Instance(value)
    }
}

impl<T: Into<Data>> From<Option<T>> for Data {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Data::Null)
    }
}
