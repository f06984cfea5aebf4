//! Builder pattern for creating schemas.
//!
//! This module provides ergonomic builders for constructing schemas and
//! their field specs with a fluent API.

use crate::{FieldSpec, Schema};

/// Builder for creating a `Schema`.
///
/// # Example
///
/// ```rust
/// use constraints_core::{FieldSpecBuilder, SchemaBuilder};
///
/// let schema = SchemaBuilder::new("user_profile")
///     .version("1.0.0")
///     .description("Registered users")
///     .field(FieldSpecBuilder::new("age").validate("gte=0 & lte=150").build())
///     .build();
/// assert_eq!(schema.fields.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    name: String,
    version: Option<String>,
    description: Option<String>,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Creates a new schema builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the schema version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the schema description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a field.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds multiple fields.
    pub fn fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Builds the schema.
    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            version: self.version,
            description: self.description,
            fields: self.fields,
        }
    }
}

/// Builder for creating a `FieldSpec`.
///
/// # Example
///
/// ```rust
/// use constraints_core::FieldSpecBuilder;
///
/// let address = FieldSpecBuilder::new("address")
///     .validate("nil=false")
///     .field(FieldSpecBuilder::new("zip").validate("format=numeric").build())
///     .build();
/// assert!(address.has_nested());
/// ```
#[derive(Debug, Default)]
pub struct FieldSpecBuilder {
    name: String,
    validate: String,
    description: Option<String>,
    fields: Option<Vec<FieldSpec>>,
}

impl FieldSpecBuilder {
    /// Creates a new field builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the constraint expression.
    pub fn validate(mut self, expression: impl Into<String>) -> Self {
        self.validate = expression.into();
        self
    }

    /// Sets the field description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a nested field for records reached from this one.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.get_or_insert_with(Vec::new).push(field);
        self
    }

    /// Builds the field spec.
    pub fn build(self) -> FieldSpec {
        FieldSpec {
            name: self.name,
            validate: self.validate,
            description: self.description,
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_builder() {
        let schema = SchemaBuilder::new("users")
            .version("2.0.0")
            .fields(vec![
                FieldSpecBuilder::new("id").validate("format=uuid4").build(),
                FieldSpecBuilder::new("email").build(),
            ])
            .build();

        assert_eq!(schema.name, "users");
        assert_eq!(schema.version.as_deref(), Some("2.0.0"));
        assert_eq!(schema.description, None);
        assert_eq!(schema.fields.len(), 2);
        assert_eq!(schema.fields[1].validate, "");
    }

    #[test]
    fn test_nested_field_builder() {
        let field = FieldSpecBuilder::new("items")
            .validate("empty=false")
            .description("Order lines")
            .field(FieldSpecBuilder::new("qty").validate("gt=0").build())
            .build();

        assert_eq!(field.description.as_deref(), Some("Order lines"));
        let nested = field.fields.expect("nested fields");
        assert_eq!(nested[0].name, "qty");
    }
}
