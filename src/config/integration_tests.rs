#[cfg(test)]
mod integration_tests {
    use crate::config::{detect_feedback_loops, load_and_validate_config, load_config};
    use crate::data::Data;

    /// The bundled text pipeline loads and validates
    #[test]
    fn test_text_pipeline_yaml_loading() {
        let config = load_and_validate_config("configs/text-pipeline.yaml").unwrap();

        assert_eq!(config.toolboxes, vec!["text"]);
        assert_eq!(config.modules.len(), 5);
        assert_eq!(config.modules[0].id, "upper");
        assert_eq!(config.modules[0].type_id, "change_text_case");
        assert_eq!(config.connections.len(), 4);
        assert_eq!(config.connections[2].id.as_deref(), Some("counting"));
        assert_eq!(config.layers.len(), 2);
        assert_eq!(config.layers[1].members, vec!["tokens", "frequency"]);
    }

    /// Module configuration keeps its YAML structure as data
    #[test]
    fn test_module_configuration_values() {
        let config = load_config("configs/text-pipeline.yaml").unwrap();

        let arrows = config.modules.iter().find(|m| m.id == "arrows").unwrap();
        assert_eq!(arrows.configuration.get("prefix"), Some(&Data::from(">>> ")));

        let frequency = config.modules.iter().find(|m| m.id == "frequency").unwrap();
        assert_eq!(frequency.configuration.get("top").and_then(Data::as_i64), Some(3));
    }

    /// The bundled pipeline is loop free
    #[test]
    fn test_text_pipeline_has_no_feedback_loops() {
        let config = load_config("configs/text-pipeline.yaml").unwrap();
        assert!(detect_feedback_loops(&config).is_empty());
    }
}
