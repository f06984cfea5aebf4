//! Schema documents: constraint expressions attached to named fields.
//!
//! A schema is the file-based annotation source. It names the fields of a
//! record and the expression each one must satisfy; nested `fields` describe
//! the records reached from a field, however many dives away they are.

use serde::{Deserialize, Serialize};

/// A named set of field constraints for one kind of record.
///
/// # Example
///
/// ```rust
/// use constraints_core::{FieldSpec, Schema};
///
/// let schema = Schema {
///     name: "user_profile".to_string(),
///     version: Some("1.0.0".to_string()),
///     description: None,
///     fields: vec![FieldSpec {
///         name: "age".to_string(),
///         validate: "gte=0 & lte=150".to_string(),
///         description: None,
///         fields: None,
///     }],
/// };
/// assert_eq!(schema.expressions().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Unique name identifying this schema
    pub name: String,

    /// Optional semantic version
    #[serde(default)]
    pub version: Option<String>,

    /// Optional human-readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Fields of the root record
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// Constraint expression for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name (object key in the validated document)
    pub name: String,

    /// Raw constraint expression, empty when the field is only walked
    #[serde(default)]
    pub validate: String,

    /// Optional human-readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Fields of the records reached from this field
    #[serde(default)]
    pub fields: Option<Vec<FieldSpec>>,
}

impl FieldSpec {
    /// Returns true if records reached from this field have their own schema.
    pub fn has_nested(&self) -> bool {
        self.fields.as_ref().is_some_and(|f| !f.is_empty())
    }
}

impl Schema {
    /// Every expression in the schema with its dotted field path.
    pub fn expressions(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        collect(&self.fields, "", &mut out);
        out
    }

    /// Total number of fields, nested ones included.
    pub fn field_count(&self) -> usize {
        self.expressions().len()
    }
}

fn collect<'a>(fields: &'a [FieldSpec], prefix: &str, out: &mut Vec<(String, &'a str)>) {
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{}.{}", prefix, field.name)
        };
        out.push((path.clone(), field.validate.as_str()));
        if let Some(nested) = &field.fields {
            collect(nested, &path, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expressions_walk_nested_fields() {
        let schema: Schema = serde_json::from_value(serde_json::json!({
            "name": "orders",
            "fields": [
                {"name": "id", "validate": "format=uuid"},
                {"name": "lines", "validate": "empty=false", "fields": [
                    {"name": "qty", "validate": "gt=0"}
                ]}
            ]
        }))
        .expect("valid schema");

        assert_eq!(
            schema.expressions(),
            vec![
                ("id".to_string(), "format=uuid"),
                ("lines".to_string(), "empty=false"),
                ("lines.qty".to_string(), "gt=0"),
            ]
        );
        assert_eq!(schema.field_count(), 3);
        assert!(schema.fields[1].has_nested());
        assert!(!schema.fields[0].has_nested());
    }

    #[test]
    fn test_validate_defaults_to_empty() {
        let field: FieldSpec =
            serde_json::from_value(serde_json::json!({"name": "notes"})).expect("valid field");
        assert_eq!(field.validate, "");
        assert!(field.fields.is_none());
    }
}
