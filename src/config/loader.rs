// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{TOML_EXTENSION, YAML_EXTENSIONS};
use crate::data::Data;
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Description of a workflow, as loaded from a YAML or TOML file.
///
/// # Fields
/// * `toolboxes` - Toolboxes to import before instantiating modules
/// * `modules` - Module instances to create
/// * `connections` - Wires from output slots to input slots
/// * `layers` - Optional organizational grouping of module ids
///
/// # Example
/// ```yaml
/// toolboxes: [text]
/// modules:
///   - id: upper
///     type_id: change_text_case
///     configuration:
///       case: upper
///   - id: reverse
///     type_id: reverse_text
/// connections:
///   - start: { module: upper, slot: output$ }
///     end: { module: reverse, slot: input$ }
/// layers:
///   - id: formatting
///     members: [upper, reverse]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub toolboxes: Vec<String>,
    pub modules: Vec<ModuleConfig>,
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

/// One module instance of the workflow.
///
/// `configuration` overrides the defaults of the module's configuration
/// model; keys the model does not know are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModuleConfig {
    pub id: String,
    pub type_id: String,
    #[serde(default)]
    pub configuration: Data,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlotRef {
    pub module: String,
    pub slot: String,
}

/// A connection between two slots.
///
/// `id` defaults to `{start slot}@{start module}-{end slot}@{end module}`;
/// `adaptor` names an adaptor registered with the project builder.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConnectionConfig {
    pub id: Option<String>,
    pub start: SlotRef,
    pub end: SlotRef,
    pub adaptor: Option<String>,
}

/// A layer grouping modules (and other layers, by id) under `parent`, or
/// under the root layer when `parent` is absent.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LayerConfig {
    pub id: String,
    pub parent: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Load a workflow description, choosing the format from the extension.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<WorkflowConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if YAML_EXTENSIONS.contains(&extension.as_str()) {
        Ok(serde_yaml::from_str(&content)?)
    } else if extension == TOML_EXTENSION {
        Ok(toml::from_str(&content)?)
    } else {
        Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }
}

/// Load a workflow description and validate its structure.
///
/// Every structural problem is reported at once in
/// [`ConfigError::Validation`]. Feedback loops are only logged.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<WorkflowConfig, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_workflow_config(&cfg).map_err(ConfigError::Validation)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
toolboxes: [text]
modules:
  - id: upper
    type_id: change_text_case
    configuration:
      case: upper
  - id: reverse
    type_id: reverse_text
connections:
  - start: { module: upper, slot: output$ }
    end: { module: reverse, slot: input$ }
"#;

        let cfg: WorkflowConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.toolboxes, vec!["text"]);
        assert_eq!(cfg.modules.len(), 2);
        assert_eq!(cfg.modules[0].configuration.get("case"), Some(&Data::from("upper")));
        assert!(cfg.modules[1].configuration.is_null());
        assert_eq!(cfg.connections[0].end.module, "reverse");
        assert!(cfg.connections[0].id.is_none());
        assert!(cfg.layers.is_empty());
    }

    #[test]
    fn test_load_toml_config() {
        let toml = r#"
toolboxes = ["text"]

[[modules]]
id = "count"
type_id = "token_counter"

[[modules]]
id = "upper"
type_id = "change_text_case"
configuration = { case = "upper" }

[[connections]]
id = "counting"
adaptor = "to_text"
start = { module = "upper", slot = "output$" }
end = { module = "count", slot = "input$" }
"#;
        let file = write_temp(".toml", toml);

        let cfg = load_and_validate_config(file.path()).unwrap();
        assert_eq!(cfg.modules.len(), 2);
        assert_eq!(cfg.connections[0].id.as_deref(), Some("counting"));
        assert_eq!(cfg.connections[0].adaptor.as_deref(), Some("to_text"));
    }

    #[test]
    fn test_load_and_validate_unresolved_module() {
        let yaml = r#"
modules:
  - id: upper
    type_id: change_text_case
connections:
  - start: { module: upper, slot: output$ }
    end: { module: nonexistent, slot: input$ }
"#;
        let file = write_temp(".yaml", yaml);

        let result = load_and_validate_config(file.path());
        let error_msg = result.unwrap_err().to_string();
        assert!(error_msg.contains("references module 'nonexistent' which does not exist"));
    }

    #[test]
    fn test_load_and_validate_accepts_feedback_loops() {
        let yaml = r#"
modules:
  - id: a
    type_id: reverse_text
  - id: b
    type_id: reverse_text
connections:
  - start: { module: a, slot: output$ }
    end: { module: b, slot: input$ }
  - start: { module: b, slot: output$ }
    end: { module: a, slot: input$ }
"#;
        let file = write_temp(".yml", yaml);

        assert!(load_and_validate_config(file.path()).is_ok());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".json", "{}");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("does/not/exist.yaml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_malformed_yaml() {
        let file = write_temp(".yaml", "modules: [");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Yaml(_))));
    }
}
