// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use super::attributes::Schema;
use crate::data::{Data, Record};

/// A module's configuration: a fixed tree of typed attributes with defaults.
///
/// Read-only once built. [`extract_with`](Self::extract_with) flattens the
/// tree into plain values under a set of overrides.
///
/// # Example
/// ```
/// use the_flowgraph::config::{Attribute, ConfigurationModel, Schema};
/// use the_flowgraph::data::Data;
///
/// let model = ConfigurationModel::new([
///     ("name", Schema::from(Attribute::text("test-conf"))),
///     ("radius", Schema::from(Attribute::float(0.0).with_min(0.0))),
/// ]);
///
/// let values = model.extract_with(&Data::record([("radius", 1)]));
/// assert_eq!(values.get("name"), Some(&Data::from("test-conf")));
/// assert_eq!(values.get("radius"), Some(&Data::from(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigurationModel {
    schema: BTreeMap<String, Schema>,
}

impl ConfigurationModel {
    pub fn new<K, S, I>(entries: I) -> Self
    where
        K: Into<String>,
        S: Into<Schema>,
        I: IntoIterator<Item = (K, S)>,
    {
        Self {
            schema: entries
                .into_iter()
                .map(|(k, s)| (k.into(), s.into()))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn schema(&self) -> &BTreeMap<String, Schema> {
        &self.schema
    }

    /// Plain value tree with the model's shape. At each leaf the override is
    /// used when present and not `Null`; at each node the matching override
    /// sub-tree (or nothing) becomes the new scope. Keys absent from the
    /// model are ignored, so this never fails.
    pub fn extract_with(&self, overrides: &Data) -> Data {
        Data::Record(extract_node(&self.schema, overrides, ""))
    }

    pub fn defaults(&self) -> Data {
        self.extract_with(&Data::Null)
    }
}

fn extract_node(node: &BTreeMap<String, Schema>, overrides: &Data, prefix: &str) -> Record {
    node.iter()
        .map(|(key, schema)| {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            let scope = overrides.field(key);
            let value = match schema {
                Schema::Leaf(leaf) => leaf.resolve(&path, scope),
                Schema::Node(children) => {
                    Data::Record(extract_node(children, scope.unwrap_or(&Data::Null), &path))
                }
            };
            (key.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Attribute;

    fn model() -> ConfigurationModel {
        let axis = || Schema::from(Attribute::float(0.0));
        ConfigurationModel::new([
            ("name", Schema::from(Attribute::text("test-conf"))),
            ("radius", Schema::from(Attribute::float(0.0).with_min(0.0))),
            (
                "transform",
                Schema::node([(
                    "translation",
                    Schema::node([("x", axis()), ("y", axis()), ("z", axis())]),
                )]),
            ),
        ])
    }

    fn parse(yaml: &str) -> Data {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn extract_applies_nested_overrides() {
        let overrides = parse("radius: 1\ntransform:\n  translation:\n    x: 1");
        let expected = parse(
            "name: test-conf\nradius: 1\ntransform:\n  translation:\n    x: 1\n    y: 0\n    z: 0",
        );
        assert_eq!(model().extract_with(&overrides), expected);
    }

    #[test]
    fn extract_keeps_the_model_shape() {
        struct TestCase {
            name: &'static str,
            overrides: Data,
        }

        let test_cases = vec![
            TestCase {
                name: "no overrides",
                overrides: Data::Null,
            },
            TestCase {
                name: "unknown keys",
                overrides: parse("color: red\nradius: 2"),
            },
            TestCase {
                name: "scalar where a node is expected",
                overrides: parse("transform: 5"),
            },
            TestCase {
                name: "null leaf",
                overrides: parse("name: null"),
            },
            TestCase {
                name: "not a record",
                overrides: Data::from("radius"),
            },
        ];

        let defaults = model().defaults();
        for test_case in test_cases {
            let values = model().extract_with(&test_case.overrides);
            let keys: Vec<&String> = values.as_record().map(|r| r.keys().collect()).unwrap_or_default();
            assert_eq!(keys, vec!["name", "radius", "transform"], "Failed test case: {}", test_case.name);
            assert_eq!(
                values.get("transform"),
                defaults.get("transform"),
                "Failed test case: {}",
                test_case.name
            );
        }
        assert_eq!(defaults.get("name"), Some(&Data::from("test-conf")));
    }

    #[test]
    fn extract_is_idempotent() {
        let overrides = parse("radius: -3\ntransform:\n  translation:\n    y: 2\nextra: true");
        let once = model().extract_with(&overrides);
        let twice = model().extract_with(&once);
        assert_eq!(once, twice);
    }
}
