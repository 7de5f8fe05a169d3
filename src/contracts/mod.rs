// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Contract resolution: composable expectations that validate an input
//! value and normalize it for a module.
//!
//! An [`Expectation`] is a tree of validators. Resolving it against a value
//! returns an [`ExpectationStatus`] tree of the same shape recording which
//! nodes were fulfilled, rejected, or skipped. Resolution never fails; a
//! value that does not fit is simply rejected.

mod builders;
mod expectation;
mod status;


pub use builders::{
    contract, expect, expect_all_of, expect_any_of, expect_attribute, expect_count,
    expect_instance_of, expect_optionals_of, expect_single, expect_some, no_contract,
};
pub use expectation::{ContractSpec, Expectation, ExpectationKind, Normalizer, Predicate};
pub use status::{ExpectationStatus, Resolution};
