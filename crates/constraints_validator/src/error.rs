//! Error types for predicates and parameter parsing.

use constraints_core::Kind;
use thiserror::Error;

/// Outcome of a predicate that did not pass.
///
/// The evaluator turns `Violated` into a validation error and the other two
/// into syntax errors (or skips them in the lenient dialect).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    /// The value does not satisfy the rule
    #[error("value does not satisfy the rule")]
    Violated,

    /// The rule parameter could not be understood
    #[error("{0}")]
    Malformed(String),

    /// The rule cannot be applied to this kind of value
    #[error("rule cannot be applied to a value of kind {0}")]
    Unsupported(Kind),
}

impl PredicateError {
    /// Creates a malformed parameter error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Creates an invalid parameter error for values of `kind`.
    pub fn invalid_param(param: &str, kind: &str) -> Self {
        Self::Malformed(format!("invalid parameter \"{param}\" for {kind} value"))
    }
}

impl From<DurationError> for PredicateError {
    fn from(err: DurationError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Errors produced while parsing a duration such as `1h30m`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// Not a duration at all
    #[error("invalid duration \"{0}\"")]
    Invalid(String),

    /// A number without a unit
    #[error("missing unit in duration \"{0}\"")]
    MissingUnit(String),

    /// A unit that is not recognized
    #[error("unknown unit \"{unit}\" in duration \"{input}\"")]
    UnknownUnit { unit: String, input: String },

    /// Does not fit in a signed 64-bit nanosecond count
    #[error("duration \"{0}\" is out of range")]
    OutOfRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_messages() {
        assert_eq!(
            PredicateError::invalid_param("x", "integer").to_string(),
            "invalid parameter \"x\" for integer value"
        );
        assert_eq!(
            PredicateError::Unsupported(Kind::Boolean).to_string(),
            "rule cannot be applied to a value of kind boolean"
        );
        assert_eq!(
            PredicateError::from(DurationError::MissingUnit("5".into())),
            PredicateError::Malformed("missing unit in duration \"5\"".into())
        );
    }
}
