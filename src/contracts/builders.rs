// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Convenience constructors for the common expectation shapes.
//!
//! None of these introduce a new kind of expectation; they assemble the
//! primitives of [`Expectation`] with the descriptions used in journal
//! reports.

use std::any::Any;

use super::expectation::Expectation;
use crate::data::Data;

/// Leaf expectation from a predicate.
pub fn expect<F>(description: impl Into<String>, when: F) -> Expectation
where
    F: Fn(&Data) -> bool + Send + Sync + 'static,
{
    Expectation::of(description, when)
}

pub fn expect_any_of(description: impl Into<String>, when: Vec<Expectation>) -> Expectation {
    Expectation::any_of(description, when)
}

pub fn expect_all_of(description: impl Into<String>, when: Vec<Expectation>) -> Expectation {
    Expectation::all_of(description, when)
}

pub fn expect_optionals_of(description: impl Into<String>, when: Vec<Expectation>) -> Expectation {
    Expectation::optionals_of(description, when)
}

pub fn expect_attribute(name: impl Into<String>, when: Expectation) -> Expectation {
    Expectation::attribute(name, when)
}

/// At least one element of the input (or the input itself) fulfills `when`.
/// Normalizes to the array of matching values.
pub fn expect_some(when: Expectation) -> Expectation {
    let description = format!("1 or more of \"{}\"", when.description());
    Expectation::some_of(description, when, None)
}

/// Exactly `count` elements of the input fulfill `when`.
pub fn expect_count(count: usize, when: Expectation) -> Expectation {
    let description = format!("{} of \"{}\"", count, when.description());
    Expectation::some_of(description, when, Some(count))
}

/// Exactly one element fulfills `when`; normalizes to that element's value
/// rather than a one element array.
pub fn expect_single(when: Expectation) -> Expectation {
    expect_count(1, when).normalized_with(|data, _| match data {
        Data::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        other => other,
    })
}

/// The input is an instance of `T`, or carries one in one of the candidate
/// attributes (tried in order). Normalizes to the instance found.
///
/// # Example
/// ```
/// use the_flowgraph::contracts::expect_instance_of;
/// use the_flowgraph::data::Data;
/// use the_flowgraph::journal::Context;
///
/// struct Mesh;
///
/// let expectation = expect_instance_of::<Mesh>("Mesh", &["mesh"]);
/// let ctx = Context::detached("doc");
///
/// let mesh = Data::instance(Mesh);
/// let wrapped = Data::record([("mesh", mesh.clone())]);
///
/// assert_eq!(expectation.resolve(&wrapped, &ctx).value(), Some(&mesh));
/// assert!(expectation.resolve(&Data::from("mesh"), &ctx).is_rejected());
/// ```
pub fn expect_instance_of<T: Any>(type_name: &str, att_names: &[&str]) -> Expectation {
    let direct = Expectation::of(
        format!("A direct instance of {}", type_name),
        |data: &Data| data.is_instance_of::<T>(),
    );
    let description = if att_names.is_empty() {
        format!("A direct instance of {}", type_name)
    } else {
        format!(
            "A direct instance of {}, or such instance in attributes [{}]",
            type_name,
            att_names.join(",")
        )
    };
    let mut when = vec![direct.clone()];
    when.extend(
        att_names
            .iter()
            .map(|name| Expectation::attribute(*name, direct.clone())),
    );
    Expectation::any_of(description, when)
}

pub fn contract<R, O, K1, K2>(description: impl Into<String>, requirements: R, optionals: O) -> Expectation
where
    R: IntoIterator<Item = (K1, Expectation)>,
    O: IntoIterator<Item = (K2, Expectation)>,
    K1: Into<String>,
    K2: Into<String>,
{
    Expectation::contract(description, requirements, optionals)
}

/// Placeholder contract accepting anything as is.
pub fn no_contract() -> Expectation {
    Expectation::free()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Context;

    struct Material;

    #[test]
    fn descriptions_follow_the_builder_shape() {
        struct TestCase {
            name: &'static str,
            expectation: Expectation,
            expected: &'static str,
        }

        let number = expect("a number", |d: &Data| d.as_f64().is_some());
        let test_cases = vec![
            TestCase {
                name: "some",
                expectation: expect_some(number.clone()),
                expected: "1 or more of \"a number\"",
            },
            TestCase {
                name: "count",
                expectation: expect_count(3, number.clone()),
                expected: "3 of \"a number\"",
            },
            TestCase {
                name: "attribute",
                expectation: expect_attribute("radius", number.clone()),
                expected: "expect attribute radius",
            },
            TestCase {
                name: "instance without attributes",
                expectation: expect_instance_of::<Material>("Material", &[]),
                expected: "A direct instance of Material",
            },
            TestCase {
                name: "instance with attributes",
                expectation: expect_instance_of::<Material>("Material", &["material", "mat"]),
                expected: "A direct instance of Material, or such instance in attributes [material,mat]",
            },
            TestCase {
                name: "free",
                expectation: no_contract(),
                expected: "No expectation",
            },
        ];

        for test_case in test_cases {
            assert_eq!(
                test_case.expectation.description(),
                test_case.expected,
                "Failed test case: {}",
                test_case.name
            );
        }
    }

    #[test]
    fn expect_single_unwraps_the_match() {
        let number = expect("a number", |d: &Data| d.as_f64().is_some());
        let single = expect_single(number);
        let ctx = Context::detached("test");

        let status = single.resolve(&Data::Array(vec![Data::from("a"), Data::from(4)]), &ctx);
        assert_eq!(status.value(), Some(&Data::Number(4.0)));

        let direct = single.resolve(&Data::from(2), &ctx);
        assert_eq!(direct.value(), Some(&Data::Number(2.0)));

        let two = single.resolve(&Data::Array(vec![Data::from(1), Data::from(2)]), &ctx);
        assert!(two.is_rejected());
    }

    #[test]
    fn instance_of_prefers_direct_instance() {
        let expectation = expect_instance_of::<Material>("Material", &["material"]);
        let ctx = Context::detached("test");
        let mat = Data::instance(Material);

        let status = expectation.resolve(&mat, &ctx);
        assert_eq!(status.value(), Some(&mat));
        assert!(status.children[0].succeeded());
        assert!(status.children[1].is_unresolved());
    }
}
