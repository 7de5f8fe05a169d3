// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::{GraphError, SlotDirection};
use crate::journal::ExecutionJournal;
use crate::modules::{InputMessage, Message, ModuleInstance};
use crate::observability::messages::slot::{
    ConnectionClosed, ConnectionEstablished, ConnectionRequested, DataTransiting,
};
use crate::observability::messages::StructuredLog;
use crate::streams::{Observable, Subject, Subscription};

/// A `(module, slot)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotAddress {
    pub module_id: String,
    pub slot_id: String,
}

impl SlotAddress {
    pub fn new(module_id: impl Into<String>, slot_id: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            slot_id: slot_id.into(),
        }
    }
}

impl fmt::Display for SlotAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.slot_id, self.module_id)
    }
}

/// Reshapes a message as it crosses a connection.
pub type Adaptor = Arc<dyn Fn(&Message) -> InputMessage + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// A directed wire from an output slot to an input slot.
///
/// Nothing flows until [`Connection::connect`] resolves both ends. Each
/// message crossing the wire is recorded on the connection's own journal
/// page `data transiting`, before and after adaptation.
pub struct Connection {
    uid: String,
    start: SlotAddress,
    end: SlotAddress,
    adaptor: Option<Adaptor>,
    journal: ExecutionJournal,
    start_tap: Subject<Message>,
    end_tap: Subject<InputMessage>,
    link: Mutex<Option<Subscription>>,
    connected: Arc<AtomicBool>,
}

impl Connection {
    pub fn new(start: SlotAddress, end: SlotAddress, adaptor: Option<Adaptor>) -> Self {
        let uid = format!("{}-{}", start, end);
        Self {
            uid,
            start,
            end,
            adaptor,
            journal: ExecutionJournal::new(),
            start_tap: Subject::replay(1),
            end_tap: Subject::replay(1),
            link: Mutex::new(None),
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn start(&self) -> &SlotAddress {
        &self.start
    }

    pub fn end(&self) -> &SlotAddress {
        &self.end
    }

    pub fn journal(&self) -> &ExecutionJournal {
        &self.journal
    }

    /// Messages as they leave the start slot.
    pub fn start_observable(&self) -> Observable<Message> {
        self.start_tap.as_observable()
    }

    /// Messages as they enter the end slot, after adaptation.
    pub fn end_observable(&self) -> Observable<InputMessage> {
        self.end_tap.as_observable()
    }

    /// Subscribe the end slot to the start slot, looking both modules up
    /// through `finder`.
    ///
    /// Connecting twice does nothing, even once the source has completed;
    /// call [`Connection::disconnect`] first to wire again.
    pub fn connect<F>(&self, finder: F) -> Result<(), GraphError>
    where
        F: Fn(&str) -> Option<Arc<ModuleInstance>>,
    {
        if self.lock_link().is_some() {
            return Ok(());
        }

        let (start, end) = (self.start.to_string(), self.end.to_string());
        let requested = ConnectionRequested {
            connection_id: &self.uid,
            start: &start,
            end: &end,
        };
        let span = requested.span("connect");
        let _guard = span.enter();
        requested.log();

        let source = find_module(&finder, &self.start.module_id)?;
        let target = find_module(&finder, &self.end.module_id)?;
        let output = source
            .output_slot(&self.start.slot_id)
            .ok_or_else(|| GraphError::UnknownSlot {
                module_id: self.start.module_id.clone(),
                slot_id: self.start.slot_id.clone(),
                direction: SlotDirection::Output,
            })?;
        let input = target
            .input_slot(&self.end.slot_id)
            .ok_or_else(|| GraphError::UnknownSlot {
                module_id: self.end.module_id.clone(),
                slot_id: self.end.slot_id.clone(),
                direction: SlotDirection::Input,
            })?;

        let raw = input.raw().clone();
        let uid = self.uid.clone();
        let journal = self.journal.clone();
        let adaptor = self.adaptor.clone();
        let (start_tap, end_tap) = (self.start_tap.clone(), self.end_tap.clone());
        let (closed_uid, connected) = (self.uid.clone(), self.connected.clone());

        self.connected.store(true, Ordering::SeqCst);
        let subscription = output.observable().subscribe_with(
            move |message: &Message| {
                let transiting = DataTransiting {
                    connection_id: &uid,
                    data_kind: message.data.kind(),
                };
                let span = transiting.span("forward");
                let _guard = span.enter();
                transiting.log();

                let context = journal.add_page("data transiting", message.context.clone());
                context.info("Incoming message", message.data.clone());
                start_tap.next(message.clone());

                let adapted = match &adaptor {
                    Some(adapt) => adapt(message),
                    None => InputMessage::from(message.clone()),
                };
                context.info("Adapted message", adapted.data.clone());

                end_tap.next(adapted.clone());
                raw.next(adapted);
                context.end();
            },
            move || {
                if connected.swap(false, Ordering::SeqCst) {
                    ConnectionClosed {
                        connection_id: &closed_uid,
                        reason: "source completed",
                    }
                    .log();
                }
            },
        );

        *self.lock_link() = Some(subscription);
        ConnectionEstablished {
            connection_id: &self.uid,
            adapted: self.adaptor.is_some(),
        }
        .log();
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> ConnectionStatus {
        if self.is_connected() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }

    /// Stop forwarding. The end slot stays open for its other sources.
    pub fn disconnect(&self) {
        let link = self.lock_link().take();
        if let Some(subscription) = link {
            subscription.unsubscribe();
        }
        if self.connected.swap(false, Ordering::SeqCst) {
            ConnectionClosed {
                connection_id: &self.uid,
                reason: "disconnected",
            }
            .log();
        }
    }

    fn lock_link(&self) -> MutexGuard<'_, Option<Subscription>> {
        self.link.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn find_module<F>(finder: &F, module_id: &str) -> Result<Arc<ModuleInstance>, GraphError>
where
    F: Fn(&str) -> Option<Arc<ModuleInstance>>,
{
    finder(module_id).ok_or_else(|| GraphError::UnknownModule {
        module_id: module_id.to_string(),
    })
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("uid", &self.uid)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("adapted", &self.adaptor.is_some())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Data;
    use crate::modules::ForwardArgs;
    use crate::toolboxes::text::{change_text_case, reverse_text, token_counter};
    use std::collections::BTreeMap;

    fn modules() -> BTreeMap<String, Arc<ModuleInstance>> {
        let build = |module: crate::modules::Module, uid: &str| {
            let instance = module.build(ForwardArgs {
                uid: Some(uid.to_string()),
                configuration: Data::Null,
            });
            (uid.to_string(), Arc::new(instance))
        };
        BTreeMap::from([
            build(change_text_case::module(), "upper"),
            build(reverse_text::module(), "reverse"),
            build(token_counter::module(), "tokens"),
        ])
    }

    fn collect<T: Clone + Send + Sync + 'static>(observable: Observable<T>) -> (Arc<Mutex<Vec<T>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = observable.subscribe(move |m: &T| sink.lock().unwrap().push(m.clone()));
        (seen, subscription)
    }

    #[test]
    fn test_default_uid() {
        let connection = Connection::new(
            SlotAddress::new("upper", "output$"),
            SlotAddress::new("reverse", "input$"),
            None,
        );
        assert_eq!(connection.uid(), "output$@upper-input$@reverse");
        assert_eq!(connection.status(), ConnectionStatus::Disconnected);
        assert_eq!(connection.with_uid("shout").uid(), "shout");
    }

    #[test]
    fn test_messages_cross_the_wire() {
        let modules = modules();
        let connection = Connection::new(
            SlotAddress::new("upper", "output$"),
            SlotAddress::new("reverse", "input$"),
            None,
        );
        connection.connect(|id| modules.get(id).cloned()).unwrap();
        assert!(connection.is_connected());

        let reverse = &modules["reverse"];
        let (seen, _subscription) = collect(reverse.output_slot("output$").unwrap().observable());
        modules["upper"].input_slots()[0].send(InputMessage::new("abc").with_context(Data::record([("run", 1)])));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].data, Data::from("CBA"));
        assert_eq!(seen[0].context, Data::record([("run", 1)]));

        let page = connection.journal().page("data transiting").unwrap();
        let texts: Vec<String> = page.entry_point.entries().into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["Incoming message", "Adapted message"]);
    }

    #[test]
    fn test_adaptor_reshapes_messages() {
        let modules = modules();
        let adaptor: Adaptor = Arc::new(|message: &Message| {
            InputMessage::new(Data::record([("text", message.data.clone())]))
                .with_configuration(Data::record([("case", "lower")]))
        });
        let feedback = Connection::new(
            SlotAddress::new("reverse", "output$"),
            SlotAddress::new("upper", "input$"),
            Some(adaptor),
        );
        feedback.connect(|id| modules.get(id).cloned()).unwrap();

        let (adapted, _a) = collect(feedback.end_observable());
        let (seen, _s) = collect(modules["upper"].output_slot("output$").unwrap().observable());
        modules["reverse"].input_slots()[0].send(InputMessage::new("OLLEH"));

        assert_eq!(adapted.lock().unwrap()[0].data, Data::record([("text", "HELLO")]));
        assert_eq!(seen.lock().unwrap()[0].data, Data::from("hello"));
    }

    #[test]
    fn test_connect_failures() {
        struct TestCase {
            name: &'static str,
            start: SlotAddress,
            end: SlotAddress,
            expected: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "unknown start module",
                start: SlotAddress::new("ghost", "output$"),
                end: SlotAddress::new("reverse", "input$"),
                expected: "No module 'ghost' in the workflow",
            },
            TestCase {
                name: "unknown end module",
                start: SlotAddress::new("upper", "output$"),
                end: SlotAddress::new("ghost", "input$"),
                expected: "No module 'ghost' in the workflow",
            },
            TestCase {
                name: "unknown output slot",
                start: SlotAddress::new("upper", "result$"),
                end: SlotAddress::new("reverse", "input$"),
                expected: "Module 'upper' has no output slot 'result$'",
            },
            TestCase {
                name: "input slot used as output",
                start: SlotAddress::new("upper", "input$"),
                end: SlotAddress::new("reverse", "input$"),
                expected: "Module 'upper' has no output slot 'input$'",
            },
            TestCase {
                name: "unknown input slot",
                start: SlotAddress::new("upper", "output$"),
                end: SlotAddress::new("reverse", "text$"),
                expected: "Module 'reverse' has no input slot 'text$'",
            },
        ];

        let modules = modules();
        for test_case in test_cases {
            let connection = Connection::new(test_case.start, test_case.end, None);
            let error = connection.connect(|id| modules.get(id).cloned()).unwrap_err();
            assert_eq!(error.to_string(), test_case.expected, "Failed test case: {}", test_case.name);
            assert!(!connection.is_connected(), "Failed test case: {}", test_case.name);
        }
    }

    #[test]
    fn test_disconnect_stops_delivery() {
        let modules = modules();
        let connection = Connection::new(
            SlotAddress::new("upper", "output$"),
            SlotAddress::new("tokens", "input$"),
            None,
        );
        connection.connect(|id| modules.get(id).cloned()).unwrap();
        let tokens = modules["tokens"].input_slots()[0].delivered();

        connection.disconnect();
        connection.disconnect();
        modules["upper"].input_slots()[0].send(InputMessage::new("one two"));

        assert_eq!(connection.status(), ConnectionStatus::Disconnected);
        assert_eq!(modules["tokens"].input_slots()[0].delivered(), tokens);
    }

    #[test]
    fn test_dropped_connection_is_inert() {
        let modules = modules();
        let connection = Connection::new(
            SlotAddress::new("upper", "output$"),
            SlotAddress::new("tokens", "input$"),
            None,
        );
        connection.connect(|id| modules.get(id).cloned()).unwrap();
        drop(connection);

        modules["upper"].input_slots()[0].send(InputMessage::new("one two"));
        assert_eq!(modules["tokens"].input_slots()[0].delivered(), 0);
    }

    #[test]
    fn test_source_completion_keeps_destination_open() {
        let mut modules = modules();
        let connection = Connection::new(
            SlotAddress::new("upper", "output$"),
            SlotAddress::new("tokens", "input$"),
            None,
        );
        connection.connect(|id| modules.get(id).cloned()).unwrap();

        drop(modules.remove("upper"));
        assert!(!connection.is_connected());

        let tokens = &modules["tokens"];
        tokens.input_slots()[0].send(InputMessage::new("still open"));
        assert_eq!(tokens.input_slots()[0].delivered(), 1);
    }
}
