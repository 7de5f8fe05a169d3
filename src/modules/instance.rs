// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use uuid::Uuid;

use super::declaration::{ForwardArgs, GeneratorArgs, ModuleDefinition};
use super::slots::{InputSlot, InputSlotParams, OutputSlot};
use crate::config::ConfigurationModel;
use crate::data::Data;
use crate::journal::ExecutionJournal;
use crate::observability::messages::workflow::ModuleInstantiated;
use crate::observability::messages::StructuredLog;

/// A running module: fixed input and output slots, a read-only
/// configuration, and the journal every slot writes to.
///
/// Dropping the instance tears down its slot subscriptions.
pub struct ModuleInstance {
    uid: String,
    type_id: String,
    configuration: Arc<ConfigurationModel>,
    configuration_instance: Data,
    input_slots: Vec<InputSlot>,
    output_slots: Vec<OutputSlot>,
    journal: ExecutionJournal,
}

impl ModuleInstance {
    pub fn new(type_id: &str, definition: ModuleDefinition, args: ForwardArgs) -> Self {
        let uid = args.uid.unwrap_or_else(|| Uuid::new_v4().to_string());
        let journal = ExecutionJournal::new();
        let context = journal.add_page("constructor", Data::empty_record());
        let configuration = Arc::new(definition.configuration);
        let static_configuration = args.configuration;
        let configuration_instance = configuration.extract_with(&static_configuration);

        let input_slots: Vec<InputSlot> = definition
            .inputs
            .into_iter()
            .map(|(slot_id, input)| {
                InputSlot::new(InputSlotParams {
                    module_id: uid.clone(),
                    slot_id,
                    description: input.description,
                    contract: input.contract,
                    configuration: configuration.clone(),
                    static_configuration: static_configuration.clone(),
                    journal: journal.clone(),
                })
            })
            .collect();

        let generated = (definition.outputs)(GeneratorArgs {
            inputs: input_slots
                .iter()
                .map(|slot| (slot.slot_id().to_string(), slot.prepared()))
                .collect(),
            configuration: configuration_instance.clone(),
            context: context.clone(),
        });

        let output_slots: Vec<OutputSlot> = generated
            .into_iter()
            .map(|(slot_id, observable)| OutputSlot::new(uid.clone(), slot_id, observable))
            .collect();

        ModuleInstantiated {
            module_id: &uid,
            type_id,
            input_slots: input_slots.len(),
            output_slots: output_slots.len(),
        }
        .log();
        context.info("module instantiated", configuration_instance.clone());
        context.end();

        Self {
            uid,
            type_id: type_id.to_string(),
            configuration,
            configuration_instance,
            input_slots,
            output_slots,
            journal,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn configuration(&self) -> &ConfigurationModel {
        &self.configuration
    }

    /// Configuration extracted from the static overrides.
    pub fn configuration_instance(&self) -> &Data {
        &self.configuration_instance
    }

    pub fn input_slots(&self) -> &[InputSlot] {
        &self.input_slots
    }

    pub fn output_slots(&self) -> &[OutputSlot] {
        &self.output_slots
    }

    pub fn input_slot(&self, slot_id: &str) -> Option<&InputSlot> {
        self.input_slots.iter().find(|s| s.slot_id() == slot_id)
    }

    pub fn output_slot(&self, slot_id: &str) -> Option<&OutputSlot> {
        self.output_slots.iter().find(|s| s.slot_id() == slot_id)
    }

    pub fn journal(&self) -> &ExecutionJournal {
        &self.journal
    }
}

impl std::fmt::Debug for ModuleInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleInstance")
            .field("uid", &self.uid)
            .field("type_id", &self.type_id)
            .field("input_slots", &self.input_slots)
            .field("output_slots", &self.output_slots)
            .finish()
    }
}
