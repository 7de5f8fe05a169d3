/// File extensions parsed as YAML workflow descriptions
pub const YAML_EXTENSIONS: &[&str] = &["yaml", "yml"];
/// File extension parsed as a TOML workflow description
pub const TOML_EXTENSION: &str = "toml";
/// Slot id used by single-input modules
pub const DEFAULT_INPUT_SLOT: &str = "input$";
/// Slot id used by single-output modules
pub const DEFAULT_OUTPUT_SLOT: &str = "output$";
/// Uid of the layer every workflow starts with
pub const ROOT_LAYER_ID: &str = "root";
