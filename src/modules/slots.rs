// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::messages::{InputMessage, Message, OutputMessage, ProcessingMessage};
use crate::config::ConfigurationModel;
use crate::contracts::Expectation;
use crate::data::Data;
use crate::journal::ExecutionJournal;
use crate::observability::messages::contract::{ContractFulfilled, ContractRejected};
use crate::observability::messages::slot::{OutputEmitted, SlotMessageDelivered, SlotMessageReceived};
use crate::observability::messages::StructuredLog;
use crate::streams::{Observable, Subject, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Idle,
    /// A message is being checked against the contract.
    Resolving,
}

#[derive(Default)]
struct SlotStats {
    delivered: AtomicU64,
    dropped: AtomicU64,
    resolving: AtomicBool,
}

/// Everything an input slot needs from its module.
pub(crate) struct InputSlotParams {
    pub module_id: String,
    pub slot_id: String,
    pub description: String,
    pub contract: Expectation,
    pub configuration: Arc<ConfigurationModel>,
    pub static_configuration: Data,
    pub journal: ExecutionJournal,
}

/// Gate in front of module logic.
///
/// Every raw message opens a journal page `Enter slot {slot_id}`, is resolved
/// against the contract, and is either dropped (rejection recorded on the
/// page) or published on the prepared stream with its normalized data and
/// the extracted configuration.
pub struct InputSlot {
    module_id: String,
    slot_id: String,
    description: String,
    contract: Expectation,
    raw: Subject<InputMessage>,
    prepared: Subject<ProcessingMessage>,
    stats: Arc<SlotStats>,
    pipeline: Subscription,
}

impl InputSlot {
    pub(crate) fn new(params: InputSlotParams) -> Self {
        let raw = Subject::new();
        let prepared = Subject::replay(1);
        let stats = Arc::new(SlotStats::default());

        let pipeline = {
            let InputSlotParams {
                module_id,
                slot_id,
                contract,
                configuration,
                static_configuration,
                journal,
                ..
            } = &params;
            let (module_id, slot_id, contract) = (module_id.clone(), slot_id.clone(), contract.clone());
            let (configuration, static_configuration) = (configuration.clone(), static_configuration.clone());
            let (journal, prepared, stats) = (journal.clone(), prepared.clone(), stats.clone());

            raw.subscribe(move |message: &InputMessage| {
                let received = SlotMessageReceived {
                    module_id: &module_id,
                    slot_id: &slot_id,
                    data_kind: message.data.kind(),
                };
                let span = received.span("contract_resolution");
                let _guard = span.enter();
                received.log();

                stats.resolving.store(true, Ordering::SeqCst);
                let context = journal.add_page(format!("Enter slot {}", slot_id), message.context.clone());
                let status = contract.resolve(&message.data, &context);

                let Some(data) = status.value().cloned() else {
                    context.error("Contract resolution failed", status.report());
                    ContractRejected {
                        module_id: &module_id,
                        slot_id: &slot_id,
                        contract: contract.description(),
                        rejected_children: status.rejected_count(),
                    }
                    .log();
                    stats.dropped.fetch_add(1, Ordering::SeqCst);
                    stats.resolving.store(false, Ordering::SeqCst);
                    context.end();
                    return;
                };

                context.info("Contract resolution succeeded", status.report());
                ContractFulfilled {
                    module_id: &module_id,
                    slot_id: &slot_id,
                    contract: contract.description(),
                }
                .log();

                let overrides = static_configuration.merged_with(&message.configuration);
                let configuration = configuration.extract_with(&overrides);
                let delivered = stats.delivered.fetch_add(1, Ordering::SeqCst) + 1;
                stats.resolving.store(false, Ordering::SeqCst);
                SlotMessageDelivered {
                    module_id: &module_id,
                    slot_id: &slot_id,
                    delivered,
                }
                .log();

                prepared.next(ProcessingMessage {
                    data,
                    configuration,
                    context: context.clone(),
                });
                context.end();
            })
        };

        Self {
            module_id: params.module_id,
            slot_id: params.slot_id,
            description: params.description,
            contract: params.contract,
            raw,
            prepared,
            stats,
            pipeline,
        }
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub fn slot_id(&self) -> &str {
        &self.slot_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn contract(&self) -> &Expectation {
        &self.contract
    }

    /// Push a message into the slot, as a connection would.
    pub fn send(&self, message: InputMessage) {
        self.raw.next(message);
    }

    /// Entry point of the slot; connections feed this subject.
    pub fn raw(&self) -> &Subject<InputMessage> {
        &self.raw
    }

    /// Messages that passed the contract. Replays the latest one.
    pub fn prepared(&self) -> Observable<ProcessingMessage> {
        self.prepared.as_observable()
    }

    pub fn delivered(&self) -> u64 {
        self.stats.delivered.load(Ordering::SeqCst)
    }

    pub fn dropped(&self) -> u64 {
        self.stats.dropped.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SlotState {
        if self.stats.resolving.load(Ordering::SeqCst) {
            SlotState::Resolving
        } else {
            SlotState::Idle
        }
    }
}

impl Drop for InputSlot {
    fn drop(&mut self) {
        self.pipeline.unsubscribe();
    }
}

impl std::fmt::Debug for InputSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSlot")
            .field("module_id", &self.module_id)
            .field("slot_id", &self.slot_id)
            .field("contract", &self.contract)
            .finish()
    }
}

/// Exposes what module logic emits on one output.
///
/// The module's stream is subscribed once, when the slot is built, and
/// multicast with a replay of one: every connection and external observer
/// sees the same messages without re-running module logic.
pub struct OutputSlot {
    module_id: String,
    slot_id: String,
    emitted: Subject<Message>,
    source: Subscription,
}

impl OutputSlot {
    pub(crate) fn new(module_id: String, slot_id: String, generated: Observable<OutputMessage>) -> Self {
        let emitted = Subject::replay(1);
        let (log_module, log_slot) = (module_id.clone(), slot_id.clone());
        let sink = emitted.clone();
        let on_complete = emitted.clone();

        let source = generated
            .tap(move |message: &OutputMessage| {
                message.context.info("emit output", message.data.clone());
                OutputEmitted {
                    module_id: &log_module,
                    slot_id: &log_slot,
                    data_kind: message.data.kind(),
                }
                .log();
            })
            .map(|message: &OutputMessage| Message {
                data: message.data.clone(),
                context: message.context.user_context().clone(),
            })
            .subscribe_with(move |message| sink.next(message.clone()), move || on_complete.complete());

        Self {
            module_id,
            slot_id,
            emitted,
            source,
        }
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub fn slot_id(&self) -> &str {
        &self.slot_id
    }

    /// Read-only tap on the emitted messages.
    pub fn observable(&self) -> Observable<Message> {
        self.emitted.as_observable()
    }
}

impl Drop for OutputSlot {
    fn drop(&mut self) {
        self.source.unsubscribe();
        self.emitted.complete();
    }
}

impl std::fmt::Debug for OutputSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSlot")
            .field("module_id", &self.module_id)
            .field("slot_id", &self.slot_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Attribute, Schema};
    use crate::contracts::{expect, expect_attribute};
    use std::sync::Mutex;

    fn slot(journal: &ExecutionJournal) -> InputSlot {
        let text = expect("a text", |d: &Data| d.as_str().is_some());
        InputSlot::new(InputSlotParams {
            module_id: "upper".to_string(),
            slot_id: "input$".to_string(),
            description: "the text".to_string(),
            contract: expect_attribute("text", text),
            configuration: Arc::new(ConfigurationModel::new([
                ("case", Schema::from(Attribute::text("upper"))),
                ("repeat", Schema::from(Attribute::integer(1))),
            ])),
            static_configuration: Data::record([("repeat", 2)]),
            journal: journal.clone(),
        })
    }

    fn collect(slot: &InputSlot) -> (Arc<Mutex<Vec<ProcessingMessage>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = slot.prepared().subscribe(move |m: &ProcessingMessage| sink.lock().unwrap().push(m.clone()));
        (seen, subscription)
    }

    #[test]
    fn accepted_message_carries_normalized_data_and_configuration() {
        let journal = ExecutionJournal::new();
        let slot = slot(&journal);
        let (seen, _subscription) = collect(&slot);

        slot.send(
            InputMessage::new(Data::record([("text", "hello")]))
                .with_configuration(Data::record([("case", "lower")]))
                .with_context(Data::record([("user", "alice")])),
        );

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].data, Data::from("hello"));
        assert_eq!(seen[0].configuration, Data::record([("case", Data::from("lower")), ("repeat", Data::from(2))]));
        assert_eq!(seen[0].context.user_context().get("user"), Some(&Data::from("alice")));
        assert_eq!(slot.delivered(), 1);
        assert_eq!(slot.state(), SlotState::Idle);
        assert!(journal.page("Enter slot input$").is_some());
    }

    #[test]
    fn rejected_message_is_dropped_and_journaled() {
        let journal = ExecutionJournal::new();
        let slot = slot(&journal);
        let (seen, _subscription) = collect(&slot);

        slot.send(InputMessage::new(Data::record([("txt", "hello")])));

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(slot.dropped(), 1);
        assert_eq!(slot.delivered(), 0);
        let page = journal.page("Enter slot input$").unwrap();
        assert!(page.entry_point.has_errors());
        assert_eq!(page.entry_point.entries()[0].text, "Contract resolution failed");
    }

    #[test]
    fn repeated_messages_keep_one_page_per_slot() {
        let journal = ExecutionJournal::new();
        let slot = slot(&journal);
        for text in ["a", "b", "c"] {
            slot.send(InputMessage::new(Data::record([("text", text)])));
        }
        assert_eq!(journal.len(), 1);
        assert_eq!(slot.delivered(), 3);
    }

    #[test]
    fn dropped_slot_is_inert() {
        let journal = ExecutionJournal::new();
        let slot = slot(&journal);
        let raw = slot.raw().clone();
        drop(slot);
        raw.next(InputMessage::new(Data::record([("text", "late")])));
        assert!(journal.is_empty());
    }

    #[test]
    fn output_slot_strips_the_diagnostic_context() {
        let page = ExecutionJournal::new().add_page("Enter slot input$", Data::record([("user", "bob")]));
        let generated = Subject::new();
        let output = OutputSlot::new("upper".into(), "output$".into(), generated.as_observable());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = output.observable().subscribe(move |m: &Message| sink.lock().unwrap().push(m.clone()));

        generated.next(OutputMessage {
            data: Data::from("HELLO"),
            context: page.clone(),
        });

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Message {
                data: Data::from("HELLO"),
                context: Data::record([("user", "bob")]),
            }]
        );
        assert_eq!(page.entries()[0].text, "emit output");
    }
}
