//! JSON documents seen through a schema.
//!
//! A bare `serde_json::Value` has no annotated fields: objects inspect as
//! mappings. Pairing it with the field list of a [`Schema`] turns objects into
//! records whose fields carry the schema's expressions.

use crate::Validator;
use constraints_core::{
    Field, FieldSpec, Inspect, Result, Schema, ValidationReport, Value, json_number,
    json_type_name,
};
use serde_json::Value as Json;
use std::borrow::Cow;

static NULL: Json = Json::Null;

/// A JSON value, optionally bound to the fields that describe it.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    value: &'a Json,
    fields: Option<&'a [FieldSpec]>,
}

impl<'a> Document<'a> {
    /// Wraps a value without a schema.
    pub fn new(value: &'a Json) -> Self {
        Self {
            value,
            fields: None,
        }
    }

    /// Wraps a value described by `schema`.
    pub fn with_schema(value: &'a Json, schema: &'a Schema) -> Self {
        Self::with_fields(value, &schema.fields)
    }

    /// Wraps a value described by a field list.
    pub fn with_fields(value: &'a Json, fields: &'a [FieldSpec]) -> Self {
        Self {
            value,
            fields: Some(fields),
        }
    }

    /// The wrapped JSON value.
    pub fn value(&self) -> &'a Json {
        self.value
    }

    fn child(&self, value: &'a Json) -> Self {
        Self {
            value,
            fields: self.fields,
        }
    }
}

impl Inspect for Document<'_> {
    fn inspect(&self) -> Value<'_> {
        match self.value {
            Json::Null => Value::Optional(None),
            Json::Bool(b) => Value::Boolean(*b),
            Json::Number(n) => json_number(n),
            Json::String(s) => Value::String(Cow::Borrowed(s.as_str())),
            Json::Array(items) => Value::sequence(items.iter().map(|item| self.child(item))),
            Json::Object(map) => match self.fields {
                // Missing keys read as null, so they inspect as absent optionals.
                Some(fields) => Value::record(fields.iter().map(|spec| {
                    let value = map.get(&spec.name).unwrap_or(&NULL);
                    let child = Document {
                        value,
                        fields: spec.fields.as_deref(),
                    };
                    Field::new(spec.name.as_str(), spec.validate.as_str(), child)
                })),
                None => Value::mapping(map.iter().map(|(key, value)| (key, Document::new(value)))),
            },
        }
    }

    fn type_name(&self) -> Cow<'static, str> {
        match (self.value, self.fields) {
            (Json::Object(_), Some(_)) => Cow::Borrowed("record"),
            (value, _) => Cow::Borrowed(json_type_name(value)),
        }
    }
}

impl Validator {
    /// Validates one JSON document against a schema.
    ///
    /// # Example
    ///
    /// ```rust
    /// use constraints_core::{FieldSpecBuilder, SchemaBuilder};
    /// use constraints_validator::Validator;
    /// use serde_json::json;
    ///
    /// let schema = SchemaBuilder::new("users")
    ///     .field(FieldSpecBuilder::new("age").validate("gte=0 & lte=150").build())
    ///     .build();
    ///
    /// let validator = Validator::new();
    /// assert!(validator.validate_json(&schema, &json!({"age": 30})).is_ok());
    /// assert!(validator.validate_json(&schema, &json!({"age": -1})).is_err());
    /// ```
    pub fn validate_json(&self, schema: &Schema, value: &Json) -> Result {
        self.validate(&Document::with_schema(value, schema))
    }

    /// Validates many JSON documents against a schema.
    pub fn validate_json_batch<'a, I>(&self, schema: &Schema, values: I) -> ValidationReport
    where
        I: IntoIterator<Item = &'a Json>,
    {
        self.validate_batch(
            values
                .into_iter()
                .map(|value| Document::with_schema(value, schema)),
        )
    }
}
