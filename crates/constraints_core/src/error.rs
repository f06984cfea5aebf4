//! Error types for constraint evaluation.
//!
//! Two typed kinds exist: [`SyntaxError`] for malformed expressions, unknown
//! rules and shape mismatches, and [`ValidationError`] for well-formed rules a
//! value does not satisfy. Errors returned by a value's own self-check are
//! carried untouched in [`Error::Custom`].

use thiserror::Error;

/// Boxed error returned by self-check hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for constraint evaluation.
pub type Result<T = ()> = std::result::Result<T, Error>;

/// Capability shared by both typed error kinds: they know which field failed.
pub trait FieldError {
    /// Name of the field where the failure occurred (empty at the root).
    fn field_name(&self) -> &str;

    /// Sets the field name unless one was already recorded.
    ///
    /// The innermost record frame wins, outer frames leave the name alone.
    fn set_field_name(&mut self, name: &str);
}

/// A malformed expression, rule parameter or dive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.describe())]
pub struct SyntaxError {
    /// Field being validated
    pub field: String,
    /// Expression that failed to parse
    pub expression: String,
    /// Fragment of the expression around the problem
    pub near: String,
    /// What went wrong
    pub comment: String,
}

impl SyntaxError {
    /// Creates a new syntax error without a field name.
    pub fn new(
        expression: impl Into<String>,
        near: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            field: String::new(),
            expression: expression.into(),
            near: near.into(),
            comment: comment.into(),
        }
    }

    /// Records the field name if none is set yet.
    pub fn in_field(mut self, field: &str) -> Self {
        self.set_field_name(field);
        self
    }

    fn describe(&self) -> String {
        let subject = if self.field.is_empty() {
            "value".to_string()
        } else {
            format!("field \"{}\"", self.field)
        };
        format!(
            "Syntax error when validating {subject}, expression \"{}\" near \"{}\": {}",
            self.expression, self.near, self.comment
        )
    }
}

impl FieldError for SyntaxError {
    fn field_name(&self) -> &str {
        &self.field
    }

    fn set_field_name(&mut self, name: &str) {
        if self.field.is_empty() {
            self.field = name.to_string();
        }
    }
}

/// A value that does not satisfy a well-formed rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.describe())]
pub struct ValidationError {
    /// Field being validated
    pub field: String,
    /// Type of the offending value
    pub type_name: String,
    /// Rule that failed (e.g. `gte`)
    pub rule: String,
    /// Raw rule parameter (e.g. `0`)
    pub param: String,
}

impl ValidationError {
    /// Creates a new validation error without a field name.
    pub fn new(
        type_name: impl Into<String>,
        rule: impl Into<String>,
        param: impl Into<String>,
    ) -> Self {
        Self {
            field: String::new(),
            type_name: type_name.into(),
            rule: rule.into(),
            param: param.into(),
        }
    }

    /// Records the field name if none is set yet.
    pub fn in_field(mut self, field: &str) -> Self {
        self.set_field_name(field);
        self
    }

    /// The rule as it was written, e.g. `gte=0` or `nil`.
    pub fn rule_text(&self) -> String {
        if self.param.is_empty() {
            self.rule.clone()
        } else {
            format!("{}={}", self.rule, self.param)
        }
    }

    fn describe(&self) -> String {
        let subject = if self.field.is_empty() {
            "value".to_string()
        } else {
            format!("field \"{}\"", self.field)
        };
        format!(
            "Validation error in {subject} of type \"{}\" using validator \"{}\"",
            self.type_name,
            self.rule_text()
        )
    }
}

impl FieldError for ValidationError {
    fn field_name(&self) -> &str {
        &self.field
    }

    fn set_field_name(&mut self, name: &str) {
        if self.field.is_empty() {
            self.field = name.to_string();
        }
    }
}

/// Main error type for constraint evaluation.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed expression or parameter
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Value failed a rule
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Error returned by a value's self-check, passed through as-is
    #[error("{0}")]
    Custom(BoxError),
}

impl Error {
    /// Wraps an arbitrary error coming from a self-check.
    pub fn custom(err: impl Into<BoxError>) -> Self {
        Self::Custom(err.into())
    }

    /// Field name of a typed error; `None` for custom errors.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Syntax(e) => Some(e.field_name()),
            Self::Validation(e) => Some(e.field_name()),
            Self::Custom(_) => None,
        }
    }

    /// Records the field name on typed errors that do not carry one yet.
    pub fn with_field(mut self, name: &str) -> Self {
        match &mut self {
            Self::Syntax(e) => e.set_field_name(name),
            Self::Validation(e) => e.set_field_name(name),
            Self::Custom(_) => {}
        }
        self
    }

    /// Returns true for syntax errors.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    /// Returns true for validation errors.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
