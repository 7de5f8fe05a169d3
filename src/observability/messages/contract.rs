// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for contract resolution at input slots.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An inbound message failed its slot contract and was dropped.
///
/// # Log Level
/// `warn!` - The message is discarded, the flow keeps running
///
/// # Example
/// ```
/// use the_flowgraph::observability::messages::contract::ContractRejected;
///
/// let msg = ContractRejected {
///     module_id: "sphere",
///     slot_id: "input$",
///     contract: "material & mesh",
///     rejected_children: 1,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct ContractRejected<'a> {
    pub module_id: &'a str,
    pub slot_id: &'a str,
    pub contract: &'a str,
    pub rejected_children: usize,
}

impl Display for ContractRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Contract '{}' rejected message on slot '{}' of module '{}' ({} rejected sub-expectations)",
            self.contract, self.slot_id, self.module_id, self.rejected_children
        )
    }
}

impl StructuredLog for ContractRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            module_id = self.module_id,
            slot_id = self.slot_id,
            contract = self.contract,
            rejected_children = self.rejected_children,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "contract_rejected",
            span_name = name,
            module_id = self.module_id,
            slot_id = self.slot_id,
            contract = self.contract,
        )
    }
}

/// An inbound message fulfilled its slot contract.
///
/// # Log Level
/// `debug!` - Per-message detail
pub struct ContractFulfilled<'a> {
    pub module_id: &'a str,
    pub slot_id: &'a str,
    pub contract: &'a str,
}

impl Display for ContractFulfilled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Contract '{}' fulfilled on slot '{}' of module '{}'",
            self.contract, self.slot_id, self.module_id
        )
    }
}

impl StructuredLog for ContractFulfilled<'_> {
    fn log(&self) {
        tracing::debug!(
            module_id = self.module_id,
            slot_id = self.slot_id,
            contract = self.contract,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "contract_fulfilled",
            span_name = name,
            module_id = self.module_id,
            slot_id = self.slot_id,
        )
    }
}

/// A configuration override fell outside the attribute's declared bounds.
///
/// # Log Level
/// `warn!` - The override is used as-is; extraction never clamps
pub struct ConfigurationOverrideOutOfBounds<'a> {
    pub attribute: &'a str,
    pub value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Display for ConfigurationOverrideOutOfBounds<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration override '{}' = {} is outside bounds [{:?}, {:?}]",
            self.attribute, self.value, self.min, self.max
        )
    }
}

impl StructuredLog for ConfigurationOverrideOutOfBounds<'_> {
    fn log(&self) {
        tracing::warn!(
            attribute = self.attribute,
            value = self.value,
            min = ?self.min,
            max = ?self.max,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "configuration_out_of_bounds",
            span_name = name,
            attribute = self.attribute,
            value = self.value,
        )
    }
}
