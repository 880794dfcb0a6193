//! Parser for validation rule files (YAML/TOML/JSON formats).
//!
//! This crate loads rule files into the strongly-typed [`ValidationConfig`]
//! structure, groups several rule files into a [`RuleCatalog`], and parses
//! request or response payloads into [`DataValue`] graphs that the validator
//! can walk without a dedicated model type.
//!
//! # Example
//!
//! ```rust
//! use rules_parser::parse_yaml;
//!
//! let yaml = r#"
//! requests:
//!   createOrder:
//!     path: /api/orders
//!     method: POST
//!     validations:
//!       - field: orderId
//!         rules:
//!           - type: required
//!           - type: pattern
//!             value: ^ORD-[0-9]{6}$
//! "#;
//!
//! let config = parse_yaml(yaml).expect("Failed to parse rule file");
//! let endpoint = config.request_validation("createOrder").unwrap();
//! assert_eq!(endpoint.path.as_deref(), Some("/api/orders"));
//! assert_eq!(endpoint.validations.len(), 1);
//! ```

mod catalog;
mod config;

pub use catalog::*;
pub use config::*;

use rules_core::DataValue;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while loading rule files or documents.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// No rule file exists for a rule set name
    #[error("No rule file found for '{name}' in {}", dir.display())]
    RuleFileNotFound { name: String, dir: PathBuf },

    /// A rule set was looked up that the catalog does not hold
    #[error("Unknown rule set: {0}")]
    UnknownRuleSet(String),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

impl RuleFormat {
    /// Extensions probed when looking for a rule file, in priority order.
    pub const EXTENSIONS: [&'static str; 4] = ["yml", "yaml", "toml", "json"];
}

/// Parse a rule file from a YAML string.
pub fn parse_yaml(content: &str) -> Result<ValidationConfig> {
    parse_str(content, RuleFormat::Yaml)
}

/// Parse a rule file from a TOML string.
///
/// # Example
///
/// ```rust
/// use rules_parser::parse_toml;
///
/// let toml = r#"
/// [responses.getOrder]
/// path = "/api/orders/{id}"
/// method = "GET"
///
/// [[responses.getOrder.validations]]
/// field = "status"
/// rules = [{ type = "required" }]
/// "#;
///
/// let config = parse_toml(toml).unwrap();
/// assert!(config.response_validation("getOrder").is_some());
/// assert!(config.requests.is_empty());
/// ```
pub fn parse_toml(content: &str) -> Result<ValidationConfig> {
    parse_str(content, RuleFormat::Toml)
}

/// Parse a rule file from a JSON string.
pub fn parse_json(content: &str) -> Result<ValidationConfig> {
    parse_str(content, RuleFormat::Json)
}

/// Detect the file format from a path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `RuleFormat::Yaml`
/// * `.toml` → `RuleFormat::Toml`
/// * `.json` → `RuleFormat::Json`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<RuleFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(RuleFormat::Yaml),
        "toml" => Ok(RuleFormat::Toml),
        "json" => Ok(RuleFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a rule file with automatic format detection.
///
/// ```no_run
/// use rules_parser::parse_file;
/// use std::path::Path;
///
/// let config = parse_file(Path::new("rules/orders.yml")).unwrap();
/// println!("Loaded {} request rule sets", config.requests.len());
/// ```
pub fn parse_file(path: &Path) -> Result<ValidationConfig> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let config: ValidationConfig = parse_str(&content, format)?;

    info!("Loaded validation rules from {}", path.display());
    debug!(
        requests = config.requests.len(),
        responses = config.responses.len(),
        "Rule file endpoints"
    );

    Ok(config)
}

/// Parse a YAML payload into a dynamic value graph.
pub fn parse_document_yaml(content: &str) -> Result<DataValue> {
    parse_str(content, RuleFormat::Yaml)
}

/// Parse a TOML payload into a dynamic value graph.
pub fn parse_document_toml(content: &str) -> Result<DataValue> {
    parse_str(content, RuleFormat::Toml)
}

/// Parse a JSON payload into a dynamic value graph.
///
/// ```rust
/// use rules_parser::parse_document_json;
///
/// let order = parse_document_json(r#"{"orderId": "ORD-123456", "items": []}"#).unwrap();
/// assert_eq!(order.get("orderId").and_then(|v| v.as_string()), Some("ORD-123456"));
/// ```
pub fn parse_document_json(content: &str) -> Result<DataValue> {
    parse_str(content, RuleFormat::Json)
}

/// Load a payload file into a dynamic value graph, detecting its format.
pub fn load_document(path: &Path) -> Result<DataValue> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!("Loaded document from {}", path.display());
    parse_str(&content, format)
}

fn parse_str<T: DeserializeOwned>(content: &str, format: RuleFormat) -> Result<T> {
    match format {
        RuleFormat::Yaml => Ok(serde_yaml_ng::from_str(content)?),
        RuleFormat::Toml => toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string())),
        RuleFormat::Json => Ok(serde_json::from_str(content)?),
    }
}
