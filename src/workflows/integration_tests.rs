#[cfg(test)]
mod integration_tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use crate::config::load_and_validate_config;
    use crate::config::{ConfigurationModel, WorkflowConfig};
    use crate::connections::Adaptor;
    use crate::data::Data;
    use crate::errors::{ConfigError, GraphError, SlotDirection, ValidationError};
    use crate::modules::{Declaration, GeneratorArgs, InputMessage, Message, Module, ModuleDefinition, ModuleInstance};
    use crate::streams::{Observable, Subscription};
    use crate::toolboxes::LocalEnvironment;
    use crate::workflows::{FlowNode, ProjectState};

    async fn text_project() -> ProjectState {
        let project = ProjectState::empty(Arc::new(LocalEnvironment::builtin()));
        project.import("text").await.unwrap();
        project
    }

    async fn module(project: &ProjectState, type_id: &str, uid: &str) -> Arc<ModuleInstance> {
        project.instantiate(type_id, Some(uid), Data::Null).await.unwrap()
    }

    fn collect(observable: Observable<Message>) -> (Arc<Mutex<Vec<Data>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = observable.subscribe(move |m: &Message| sink.lock().unwrap().push(m.data.clone()));
        (seen, subscription)
    }

    #[derive(Clone, Default)]
    struct SpanNames(Arc<Mutex<Vec<String>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for SpanNames {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::span::Id,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            self.0.lock().unwrap().push(attrs.metadata().name().to_string());
        }
    }

    /// Instantiation, wiring, slot resolution and forwarding each open a span
    #[tokio::test]
    async fn test_operations_run_inside_spans() {
        use tracing_subscriber::layer::SubscriberExt;

        let names = SpanNames::default();
        let _default = tracing::subscriber::set_default(tracing_subscriber::registry().with(names.clone()));

        let project = text_project().await;
        let upper = module(&project, "change_text_case", "upper").await;
        let reverse = module(&project, "reverse_text", "reverse").await;
        let project = project
            .add_flows(vec![vec![FlowNode::new(upper), FlowNode::new(reverse)]])
            .unwrap();
        project.get_input_slot("upper", "input$").unwrap().send(InputMessage::new("abc"));

        let names = names.0.lock().unwrap();
        for expected in ["instantiate_module", "connection", "input_slot", "data_transiting"] {
            assert!(names.iter().any(|n| n == expected), "missing span: {}", expected);
        }
        assert_eq!(names.iter().filter(|n| *n == "input_slot").count(), 2);
    }

    /// Layers group modules without touching the wiring
    #[tokio::test]
    async fn test_project_layers() {
        let project = text_project().await;
        let m0 = module(&project, "change_text_case", "m0").await;
        let m1 = module(&project, "reverse_text", "m1").await;
        let m2 = module(&project, "prefix_suffix_adder", "m2").await;
        let m3 = module(&project, "token_counter", "m3").await;

        let project = project
            .add_flows(vec![vec![FlowNode::new(m0), FlowNode::new(m1), FlowNode::new(m2), FlowNode::new(m3)]])
            .unwrap();
        assert_eq!(project.main().module_count(), 4);
        assert_eq!(project.main().connection_count(), 3);
        assert_eq!(project.main().root_layer().module_ids.len(), 4);
        assert!(project.main().root_layer().children.is_empty());

        let project = project.add_layer(None, Some("foo"), &["m1", "m2", "m3"]).unwrap();
        let root = project.main().root_layer();
        assert_eq!(root.module_ids, vec!["m0"]);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].uid, "foo");
        assert_eq!(root.children[0].module_ids.len(), 3);

        let project = project.add_layer(Some("foo"), Some("bar"), &["m2", "m3"]).unwrap();
        let foo = &project.main().root_layer().children[0];
        assert_eq!(foo.module_ids, vec!["m1"]);
        assert_eq!(foo.children[0].uid, "bar");
        assert_eq!(foo.children[0].module_ids, vec!["m2", "m3"]);
        assert!(project.main().connections().all(|c| c.is_connected()));
    }

    /// A rejection at one destination does not affect the other
    #[tokio::test]
    async fn test_fan_out_with_independent_contracts() {
        let project = text_project().await;
        let upper = module(&project, "change_text_case", "upper").await;
        let reverse = module(&project, "reverse_text", "reverse").await;
        let tokens = module(&project, "token_counter", "tokens").await;
        let to_length: Adaptor = Arc::new(|m: &Message| InputMessage::new(m.data.as_str().map(str::len).unwrap_or(0)));

        let project = project
            .add_flows(vec![
                vec![FlowNode::new(upper.clone()), FlowNode::new(reverse.clone())],
                vec![FlowNode::new(upper), FlowNode::new(tokens.clone()).with_adaptor(to_length)],
            ])
            .unwrap();
        assert_eq!(project.main().module_count(), 3);

        let (reversed, _subscription) = collect(project.get_observable("reverse", "output$").unwrap());
        project.get_input_slot("upper", "input$").unwrap().send(InputMessage::new("abc"));

        assert_eq!(*reversed.lock().unwrap(), vec![Data::from("CBA")]);
        assert_eq!(reverse.input_slots()[0].delivered(), 1);
        assert_eq!(tokens.input_slots()[0].dropped(), 1);
        assert_eq!(tokens.input_slots()[0].delivered(), 0);
        let page = tokens.journal().page("Enter slot input$").unwrap();
        assert!(page.entry_point.has_errors());
    }

    /// Messages through one connection keep their order
    #[tokio::test]
    async fn test_ordering_preserved() {
        let project = text_project().await;
        let upper = module(&project, "change_text_case", "upper").await;
        let reverse = module(&project, "reverse_text", "reverse").await;
        let project = project
            .add_flows(vec![vec![FlowNode::new(upper), FlowNode::new(reverse)]])
            .unwrap();

        let (seen, _subscription) = collect(project.get_observable("reverse", "output$").unwrap());
        let input = project.get_input_slot("upper", "input$").unwrap();
        for text in ["ab", "cd", "ef", "gh"] {
            input.send(InputMessage::new(text));
        }

        let expected: Vec<Data> = ["BA", "DC", "FE", "HG"].into_iter().map(Data::from).collect();
        assert_eq!(*seen.lock().unwrap(), expected);
    }

    /// Two sources feeding one input interleave in arrival order
    #[tokio::test]
    async fn test_many_to_one_wiring() {
        let project = text_project().await;
        let upper = module(&project, "change_text_case", "upper").await;
        let lower = project
            .instantiate("change_text_case", Some("lower"), Data::record([("case", Data::from("lower"))]))
            .await
            .unwrap();
        let reverse = module(&project, "reverse_text", "reverse").await;

        let project = project
            .add_flows(vec![
                vec![FlowNode::new(upper), FlowNode::new(reverse.clone())],
                vec![FlowNode::new(lower), FlowNode::new(reverse.clone())],
            ])
            .unwrap();
        assert_eq!(project.main().module_count(), 3);
        assert_eq!(project.main().connection_count(), 2);

        let wire = |uid: &str| project.main().get_connection(uid).unwrap().end_observable();
        let collect_wire = |observable: Observable<InputMessage>| {
            let seen = Arc::new(Mutex::new(Vec::<Data>::new()));
            let sink = seen.clone();
            let subscription = observable.subscribe(move |m: &InputMessage| sink.lock().unwrap().push(m.data.clone()));
            (seen, subscription)
        };
        let (from_upper, _u) = collect_wire(wire("output$@upper-input$@reverse"));
        let (from_lower, _l) = collect_wire(wire("output$@lower-input$@reverse"));
        let (reversed, _r) = collect(project.get_observable("reverse", "output$").unwrap());

        let upper_in = project.get_input_slot("upper", "input$").unwrap();
        let lower_in = project.get_input_slot("lower", "input$").unwrap();
        upper_in.send(InputMessage::new("ab"));
        lower_in.send(InputMessage::new("CD"));
        upper_in.send(InputMessage::new("ef"));
        lower_in.send(InputMessage::new("GH"));

        let expected: Vec<Data> = ["BA", "dc", "FE", "hg"].into_iter().map(Data::from).collect();
        assert_eq!(*reversed.lock().unwrap(), expected);
        assert_eq!(*from_upper.lock().unwrap(), vec![Data::from("AB"), Data::from("EF")]);
        assert_eq!(*from_lower.lock().unwrap(), vec![Data::from("cd"), Data::from("gh")]);
        assert_eq!(reverse.input_slots()[0].delivered(), 4);
    }

    /// A wire already in the workflow is rejected and leaves the state intact
    #[tokio::test]
    async fn test_duplicate_wire_in_flows() {
        let project = text_project().await;
        let upper = module(&project, "change_text_case", "upper").await;
        let reverse = module(&project, "reverse_text", "reverse").await;
        let project = project
            .add_flows(vec![vec![FlowNode::new(upper.clone()), FlowNode::new(reverse.clone())]])
            .unwrap();

        let error = project
            .add_flows(vec![vec![FlowNode::new(upper), FlowNode::new(reverse)]])
            .unwrap_err();
        assert!(matches!(
            error,
            GraphError::DuplicateConnection { connection_id } if connection_id == "output$@upper-input$@reverse"
        ));

        let (seen, _subscription) = collect(project.get_observable("reverse", "output$").unwrap());
        project.get_input_slot("upper", "input$").unwrap().send(InputMessage::new("abc"));
        assert_eq!(*seen.lock().unwrap(), vec![Data::from("CBA")]);
    }

    #[tokio::test]
    async fn test_construction_errors() {
        let project = text_project().await;
        let error = project.instantiate("sphere", None, Data::Null).await.unwrap_err();
        assert!(matches!(error, GraphError::UnknownModuleType { type_id } if type_id == "sphere"));

        let error = project.get_observable("ghost", "output$").unwrap_err();
        assert!(matches!(error, GraphError::UnknownModule { .. }));

        let error = project.add_layer(Some("nowhere"), None, &[]).unwrap_err();
        assert!(matches!(error, GraphError::UnknownLayer { .. }));
    }

    /// A module without outputs cannot start a connection
    #[tokio::test]
    async fn test_missing_slot_in_flow() {
        let sink = Module::new(Declaration::new("sink", "swallows text"), |_| ModuleDefinition {
            configuration: ConfigurationModel::empty(),
            inputs: vec![("input$".to_string(), crate::modules::Input::new("anything"))],
            outputs: Box::new(|_: GeneratorArgs| vec![]),
        });
        let project = ProjectState::empty(Arc::new(LocalEnvironment::builtin().with_module(sink)));
        project.import("text").await.unwrap();
        let first = module(&project, "sink", "first").await;
        let second = module(&project, "reverse_text", "second").await;

        let error = project
            .add_flows(vec![vec![FlowNode::new(first), FlowNode::new(second)]])
            .unwrap_err();
        assert!(matches!(
            error,
            GraphError::MissingSlot { module_id, direction: SlotDirection::Output } if module_id == "first"
        ));
    }

    /// Earlier states keep their graph; dropping every state frees it
    #[tokio::test]
    async fn test_states_share_and_release_the_graph() {
        let project = text_project().await;
        let upper = module(&project, "change_text_case", "upper").await;
        let reverse = module(&project, "reverse_text", "reverse").await;
        let weak_upper = Arc::downgrade(&upper);

        let first = project
            .add_flows(vec![vec![FlowNode::new(upper), FlowNode::new(reverse)]])
            .unwrap();
        let second = first.add_layer(None, Some("all"), &["upper", "reverse"]).unwrap();
        let weak_connection = Arc::downgrade(second.main().connections().next().unwrap());

        drop(first);
        assert!(weak_upper.upgrade().is_some());
        assert!(second.main().connections().all(|c| c.is_connected()));

        drop(second);
        assert!(weak_upper.upgrade().is_none());
        assert!(weak_connection.upgrade().is_none());
    }

    /// The bundled text pipeline runs end to end
    #[tokio::test]
    async fn test_text_pipeline_from_config() {
        let config = load_and_validate_config("configs/text-pipeline.yaml").unwrap();
        let project = ProjectState::from_config(&config, Arc::new(LocalEnvironment::builtin()), &BTreeMap::new())
            .await
            .unwrap();

        assert_eq!(project.main().module_count(), 5);
        assert!(project.main().get_connection("counting").is_some());
        assert!(project.main().get_connection("output$@upper-input$@reverse").is_some());
        let root = project.main().root_layer();
        assert!(root.module_ids.is_empty());
        assert_eq!(root.children.iter().map(|l| l.uid.as_str()).collect::<Vec<_>>(), vec!["formatting", "analysis"]);

        let entries: Vec<String> = project.main().entry_modules().iter().map(|m| m.uid().to_string()).collect();
        assert_eq!(entries, vec!["upper"]);

        let (arrows, _a) = collect(project.get_observable("arrows", "output$").unwrap());
        let (tokens, _t) = collect(project.get_observable("tokens", "output$").unwrap());
        let (frequency, _f) = collect(project.get_observable("frequency", "output$").unwrap());
        project
            .get_input_slot("upper", "input$")
            .unwrap()
            .send(InputMessage::new("hello world hello"));

        assert_eq!(*arrows.lock().unwrap(), vec![Data::from(">>> OLLEH DLROW OLLEH <<<")]);
        assert_eq!(
            tokens.lock().unwrap()[0],
            Data::record([
                ("char_count", Data::from(17)),
                ("word_count", Data::from(3)),
                ("line_count", Data::from(1)),
            ])
        );
        let frequency = frequency.lock().unwrap();
        assert_eq!(frequency[0].get("total_unique_words"), Some(&Data::from(2)));
        let ranked = frequency[0].get("frequencies").and_then(Data::as_array).unwrap();
        assert_eq!(ranked[0], Data::record([("word", Data::from("hello")), ("count", Data::from(2))]));
    }

    /// Timer-driven producers and two-input combinators run end to end
    #[tokio::test]
    async fn test_reactive_pipeline_from_config() {
        let config = load_and_validate_config("configs/reactive-pipeline.yaml").unwrap();
        let project = ProjectState::from_config(&config, Arc::new(LocalEnvironment::builtin()), &BTreeMap::new())
            .await
            .unwrap();
        assert_eq!(project.main().module_count(), 7);
        let constant = project.main().get_connection("output$@label-input_1$@pair").unwrap();
        assert!(!constant.is_connected());
        assert_eq!(constant.journal().len(), 1);

        let (logged, _subscription) = collect(project.get_observable("log", "output$").unwrap());
        project.get_input_slot("shout", "input$").unwrap().send(InputMessage::new("go"));

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while logged.lock().unwrap().len() < 4 {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let pair = |tick: i64| Data::Array(vec![Data::from(tick), Data::from("tick")]);
        assert_eq!(
            *logged.lock().unwrap(),
            vec![Data::from("GO"), pair(0), pair(1), pair(2)]
        );
        let take = project.main().get_connection("output$@ticks-input$@first").unwrap();
        assert!(take.is_connected());
        let paired = project.main().get_connection("output$@first-input_0$@pair").unwrap();
        assert!(!paired.is_connected());
    }

    #[tokio::test]
    async fn test_adaptors_resolved_by_name() {
        let config: WorkflowConfig = serde_yaml::from_str(
            r#"
toolboxes: [text]
modules:
  - id: reverse
    type_id: reverse_text
  - id: shout
    type_id: change_text_case
connections:
  - start: { module: reverse, slot: output$ }
    end: { module: shout, slot: input$ }
    adaptor: wrap
"#,
        )
        .unwrap();

        let error = ProjectState::from_config(&config, Arc::new(LocalEnvironment::builtin()), &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(error, GraphError::UnknownAdaptor { name } if name == "wrap"));

        let wrap: Adaptor = Arc::new(|m: &Message| InputMessage::new(Data::record([("text", m.data.clone())])));
        let adaptors = BTreeMap::from([("wrap".to_string(), wrap)]);
        let project = ProjectState::from_config(&config, Arc::new(LocalEnvironment::builtin()), &adaptors)
            .await
            .unwrap();

        let (seen, _subscription) = collect(project.get_observable("shout", "output$").unwrap());
        project.get_input_slot("reverse", "input$").unwrap().send(InputMessage::new("olleh"));
        assert_eq!(*seen.lock().unwrap(), vec![Data::from("HELLO")]);
    }

    /// Connections sharing an id never overwrite each other
    #[tokio::test]
    async fn test_duplicate_connection_id_in_config() {
        let config: WorkflowConfig = serde_yaml::from_str(
            r#"
toolboxes: [text]
modules:
  - id: upper
    type_id: change_text_case
  - id: reverse
    type_id: reverse_text
  - id: tokens
    type_id: token_counter
connections:
  - id: wire
    start: { module: upper, slot: output$ }
    end: { module: reverse, slot: input$ }
  - id: wire
    start: { module: upper, slot: output$ }
    end: { module: tokens, slot: input$ }
"#,
        )
        .unwrap();

        let error = ProjectState::from_config(&config, Arc::new(LocalEnvironment::builtin()), &BTreeMap::new())
            .await
            .unwrap_err();
        match error {
            GraphError::Config(ConfigError::Validation(errors)) => assert_eq!(
                errors,
                vec![ValidationError::DuplicateConnectionId {
                    connection_id: "wire".into()
                }]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config: WorkflowConfig = serde_yaml::from_str(
            r#"
modules:
  - id: a
    type_id: reverse_text
connections:
  - start: { module: a, slot: output$ }
    end: { module: b, slot: input$ }
"#,
        )
        .unwrap();

        let error = ProjectState::from_config(&config, Arc::new(LocalEnvironment::builtin()), &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(error, GraphError::Config(_)));
    }
}
