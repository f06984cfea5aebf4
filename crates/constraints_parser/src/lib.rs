//! Parser for constraint expressions and schema documents (YAML/TOML/JSON).
//!
//! Two grammars live here:
//!
//! - the expression mini-language: [`split`] separates the key, value and
//!   remainder parts of one level and [`parse_rules`] turns the value part
//!   into OR-groups of AND-rules;
//! - schema documents that attach expressions to named fields, loaded from
//!   files into [`Schema`].
//!
//! # Example
//!
//! ```rust
//! use constraints_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: user_profile
//! version: "1.0.0"
//! fields:
//!   - name: age
//!     validate: "gte=0 & lte=150"
//!   - name: tags
//!     validate: "empty=false > format=alpha"
//! "#;
//!
//! let schema = parse_yaml(yaml).expect("Failed to parse schema");
//! assert_eq!(schema.name, "user_profile");
//! assert_eq!(schema.fields.len(), 2);
//! ```

pub mod expression;
pub mod rules;
pub mod split;

pub use expression::{Expression, parse_expression, parse_with};
pub use rules::{Rule, RuleSet, parse_rules};
pub use split::{Split, Splitter, split};

use constraints_core::Schema;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a schema.
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
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported schema file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Parse a schema from a YAML string.
///
/// # Example
///
/// ```rust
/// use constraints_parser::parse_yaml;
///
/// let yaml = r#"
/// name: servers
/// fields:
///   - name: port
///     validate: "gte=1024"
/// "#;
///
/// let schema = parse_yaml(yaml).unwrap();
/// assert_eq!(schema.fields[0].validate, "gte=1024");
/// ```
pub fn parse_yaml(content: &str) -> Result<Schema> {
    let schema: Schema = serde_yaml_ng::from_str(content)?;
    Ok(schema)
}

/// Parse a schema from a TOML string.
///
/// # Example
///
/// ```rust
/// use constraints_parser::parse_toml;
///
/// let toml = r#"
/// name = "servers"
///
/// [[fields]]
/// name = "port"
/// validate = "gte=1024"
/// "#;
///
/// let schema = parse_toml(toml).unwrap();
/// assert_eq!(schema.fields[0].name, "port");
/// ```
pub fn parse_toml(content: &str) -> Result<Schema> {
    let schema: Schema =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(schema)
}

/// Parse a schema from a JSON string.
pub fn parse_json(content: &str) -> Result<Schema> {
    let schema: Schema = serde_json::from_str(content)?;
    Ok(schema)
}

/// Detect the schema format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `SchemaFormat::Yaml`
/// * `.toml` → `SchemaFormat::Toml`
/// * `.json` → `SchemaFormat::Json`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<SchemaFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(SchemaFormat::Yaml),
        "toml" => Ok(SchemaFormat::Toml),
        "json" => Ok(SchemaFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a schema from a file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use constraints_parser::parse_file;
/// use std::path::Path;
///
/// let schema = parse_file(Path::new("schemas/user_profile.yml")).unwrap();
/// println!("Loaded schema: {}", schema.name);
/// ```
pub fn parse_file(path: &Path) -> Result<Schema> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        SchemaFormat::Yaml => parse_yaml(&content),
        SchemaFormat::Toml => parse_toml(&content),
        SchemaFormat::Json => parse_json(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constraints_core::{FieldSpecBuilder, SchemaBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_valid_yaml_minimal() {
        let yaml = r#"
name: empty_schema
"#;

        let schema = parse_yaml(yaml).expect("Failed to parse valid YAML");

        assert_eq!(schema.name, "empty_schema");
        assert_eq!(schema.version, None);
        assert_eq!(schema.description, None);
        assert!(schema.fields.is_empty());
    }

    #[test]
    fn test_parse_valid_yaml_with_nested_fields() {
        let yaml = r#"
name: user_profile
version: "1.0.0"
description: Registered users
fields:
  - name: age
    validate: "gte=0 & lte=150"
    description: Age in years
  - name: address
    validate: "nil=false"
    fields:
      - name: zip
        validate: "format=numeric"
  - name: notes
"#;

        let schema = parse_yaml(yaml).expect("Failed to parse YAML with fields");

        assert_eq!(schema.version, Some("1.0.0".to_string()));
        assert_eq!(schema.fields.len(), 3);

        let age = &schema.fields[0];
        assert_eq!(age.validate, "gte=0 & lte=150");
        assert_eq!(age.description, Some("Age in years".to_string()));

        let address = &schema.fields[1];
        assert!(address.has_nested());
        assert_eq!(
            address.fields.as_ref().map(|f| f[0].validate.as_str()),
            Some("format=numeric")
        );

        assert_eq!(schema.fields[2].validate, "");
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let invalid_yaml = r#"
name: test
fields:
  - validate: "gte=0"
    missing the name
"#;

        let result = parse_yaml(invalid_yaml);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_yaml_missing_required_fields() {
        let yaml = r#"
version: "1.0.0"
fields: []
"#;

        assert!(parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_parse_toml_with_nested_fields() {
        let toml = r#"
name = "orders"
version = "2.1.0"

[[fields]]
name = "id"
validate = "format=uuid4"

[[fields]]
name = "lines"
validate = "empty=false"

[[fields.fields]]
name = "qty"
validate = "gt=0"
"#;

        let schema = parse_toml(toml).expect("Failed to parse TOML with fields");

        assert_eq!(schema.name, "orders");
        assert_eq!(schema.fields.len(), 2);
        assert_eq!(schema.field_count(), 3);
        assert_eq!(schema.fields[0].validate, "format=uuid4");
    }

    #[test]
    fn test_parse_invalid_toml() {
        let invalid_toml = r#"
name = "test"
[[[invalid syntax
"#;

        let result = parse_toml(invalid_toml);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"name": "events", "fields": [{"name": "kind", "validate": "one_of=a,b"}]}"#;
        let schema = parse_json(json).expect("Failed to parse JSON");
        assert_eq!(schema.fields[0].validate, "one_of=a,b");

        assert!(matches!(
            parse_json("{").unwrap_err(),
            ParserError::JsonError(_)
        ));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(Path::new("schema.yaml")).unwrap(),
            SchemaFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("schema.YML")).unwrap(),
            SchemaFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("schema.toml")).unwrap(),
            SchemaFormat::Toml
        );
        assert_eq!(
            detect_format(Path::new("schema.json")).unwrap(),
            SchemaFormat::Json
        );
    }

    #[test]
    fn test_detect_format_unsupported() {
        let result = detect_format(Path::new("schema.xml"));
        assert!(matches!(
            result.unwrap_err(),
            ParserError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_detect_format_no_extension() {
        let result = detect_format(Path::new("schema"));
        assert!(matches!(result.unwrap_err(), ParserError::InvalidExtension));
    }

    #[test]
    fn test_round_trip_yaml() {
        let original = SchemaBuilder::new("test")
            .version("1.0.0")
            .description("Test description")
            .field(
                FieldSpecBuilder::new("scores")
                    .validate("[empty=false] > gte=0")
                    .build(),
            )
            .build();

        let yaml = serde_yaml_ng::to_string(&original).expect("Failed to serialize");
        let parsed = parse_yaml(&yaml).expect("Failed to parse");

        assert_eq!(parsed, original);
    }
}
