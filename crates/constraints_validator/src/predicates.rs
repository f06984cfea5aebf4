//! Named predicates and the registry the evaluator dispatches through.
//!
//! A predicate receives the inspected value, the raw rule parameter and the
//! format registry. It parses the parameter according to the value's kind:
//! integers as `i64`, unsigned integers as `u64`, floats as `f64`, durations
//! with the duration grammar, and the length of strings, sequences and
//! mappings as `usize`.

use crate::{FormatRegistry, PredicateError, parse_duration};
use constraints_core::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Result of a predicate.
pub type PredicateResult = Result<(), PredicateError>;

/// A named check applied to one value.
pub type Predicate = Arc<dyn Fn(&Value<'_>, &str, &FormatRegistry) -> PredicateResult + Send + Sync>;

/// Lookup table of named predicates plus the formats used by `format`.
///
/// Built once, then shared read-only by every evaluation.
///
/// # Example
///
/// ```rust
/// use constraints_core::Value;
/// use constraints_validator::{FormatRegistry, PredicateError, Registry};
///
/// let registry = Registry::new().with_predicate("even", |value: &Value<'_>, _: &str, _: &FormatRegistry| {
///     match value.as_integer() {
///         Some(i) if i % 2 == 0 => Ok(()),
///         Some(_) => Err(PredicateError::Violated),
///         None => Err(PredicateError::Unsupported(value.kind())),
///     }
/// });
///
/// assert!(registry.check("even", &Value::Integer(4), "").unwrap().is_ok());
/// assert!(registry.check("gte", &Value::Integer(4), "5").unwrap().is_err());
/// ```
#[derive(Clone)]
pub struct Registry {
    predicates: HashMap<String, Predicate>,
    formats: FormatRegistry,
}

impl Registry {
    /// Creates a registry with the built-in predicates and formats.
    pub fn new() -> Self {
        let mut registry = Self {
            predicates: HashMap::new(),
            formats: FormatRegistry::new(),
        };

        for (name, cmp) in [
            ("eq", Comparison::Eq),
            ("ne", Comparison::Ne),
            ("gt", Comparison::Gt),
            ("lt", Comparison::Lt),
            ("gte", Comparison::Gte),
            ("lte", Comparison::Lte),
        ] {
            registry.register(
                name,
                move |value: &Value<'_>, param: &str, _: &FormatRegistry| compare(cmp, value, param),
            );
        }

        registry
            .register("empty", empty)
            .register("nil", nil)
            .register("one_of", one_of)
            .register("format", format);

        registry
    }

    /// Creates a registry without predicates or formats.
    pub fn empty() -> Self {
        Self {
            predicates: HashMap::new(),
            formats: FormatRegistry::empty(),
        }
    }

    /// Registers a predicate, replacing any predicate of the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F) -> &mut Self
    where
        F: Fn(&Value<'_>, &str, &FormatRegistry) -> PredicateResult + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
        self
    }

    /// Builder-style variant of [`Registry::register`].
    pub fn with_predicate<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value<'_>, &str, &FormatRegistry) -> PredicateResult + Send + Sync + 'static,
    {
        self.register(name, predicate);
        self
    }

    /// Registers a format for the `format` rule.
    pub fn register_format<F>(&mut self, name: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.formats.register(name, check);
        self
    }

    /// Builder-style variant of [`Registry::register_format`].
    pub fn with_format<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.register_format(name, check);
        self
    }

    /// Replaces the format registry.
    pub fn with_formats(mut self, formats: FormatRegistry) -> Self {
        self.formats = formats;
        self
    }

    /// Looks a predicate up by name.
    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(name)
    }

    /// Returns true if a predicate of that name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// The formats consulted by `format`.
    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    /// Runs a predicate; `None` when the name is unknown.
    pub fn check(&self, name: &str, value: &Value<'_>, param: &str) -> Option<PredicateResult> {
        self.get(name)
            .map(|predicate| predicate(value, param, &self.formats))
    }

    /// Predicate names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("predicates", &self.names())
            .field("formats", &self.formats)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl Comparison {
    fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Comparison::Ne, None) => true,
            (_, None) => false,
            (Comparison::Eq, Some(o)) => o.is_eq(),
            (Comparison::Ne, Some(o)) => o.is_ne(),
            (Comparison::Gt, Some(o)) => o.is_gt(),
            (Comparison::Lt, Some(o)) => o.is_lt(),
            (Comparison::Gte, Some(o)) => o.is_ge(),
            (Comparison::Lte, Some(o)) => o.is_le(),
        }
    }

    fn is_equality(self) -> bool {
        matches!(self, Comparison::Eq | Comparison::Ne)
    }
}

fn satisfied(ok: bool) -> PredicateResult {
    if ok {
        Ok(())
    } else {
        Err(PredicateError::Violated)
    }
}

fn parse<T: FromStr>(param: &str, kind: &str) -> Result<T, PredicateError> {
    param
        .parse()
        .map_err(|_| PredicateError::invalid_param(param, kind))
}

/// Boolean parameters accept `1`, `t`, `true` and `0`, `f`, `false` in
/// lower, upper or title case.
fn parse_bool(param: &str) -> Result<bool, PredicateError> {
    match param {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(PredicateError::invalid_param(param, "boolean")),
    }
}

fn compare(cmp: Comparison, value: &Value<'_>, param: &str) -> PredicateResult {
    let ordering = match value {
        Value::Integer(v) => v.partial_cmp(&parse::<i64>(param, "integer")?),
        Value::Unsigned(v) => v.partial_cmp(&parse::<u64>(param, "unsigned")?),
        Value::Float(v) => v.partial_cmp(&parse::<f64>(param, "float")?),
        Value::Duration(v) => v.partial_cmp(&parse_duration(param)?),
        Value::String(_) | Value::Sequence(_) | Value::Mapping(_) => {
            let len = value.len().unwrap_or_default();
            len.partial_cmp(&parse::<usize>(param, "length")?)
        }
        Value::Boolean(v) if cmp.is_equality() => v.partial_cmp(&parse_bool(param)?),
        other => return Err(PredicateError::Unsupported(other.kind())),
    };

    satisfied(cmp.holds(ordering))
}

fn empty(value: &Value<'_>, param: &str, _: &FormatRegistry) -> PredicateResult {
    match value {
        Value::String(_) | Value::Sequence(_) | Value::Mapping(_) => {
            satisfied(value.is_empty() == parse_bool(param)?)
        }
        other => Err(PredicateError::Unsupported(other.kind())),
    }
}

fn nil(value: &Value<'_>, param: &str, _: &FormatRegistry) -> PredicateResult {
    satisfied(value.is_absent() == parse_bool(param)?)
}

fn tokens(param: &str) -> Result<Vec<&str>, PredicateError> {
    let tokens: Vec<&str> = param
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.is_empty() {
        return Err(PredicateError::malformed(
            "one_of requires at least one value",
        ));
    }
    Ok(tokens)
}

fn any_of<T, F>(candidates: &[&str], parse_token: F, target: &T) -> PredicateResult
where
    T: PartialEq,
    F: Fn(&str) -> Result<T, PredicateError>,
{
    let mut found = false;
    for &token in candidates {
        // Every token is parsed so a malformed list is reported even on a hit.
        if parse_token(token)? == *target {
            found = true;
        }
    }
    satisfied(found)
}

fn one_of(value: &Value<'_>, param: &str, _: &FormatRegistry) -> PredicateResult {
    let candidates = tokens(param)?;

    match value {
        Value::Integer(v) => any_of(&candidates, |t| parse::<i64>(t, "integer"), v),
        Value::Unsigned(v) => any_of(&candidates, |t| parse::<u64>(t, "unsigned"), v),
        Value::Float(v) => any_of(&candidates, |t| parse::<f64>(t, "float"), v),
        Value::Duration(v) => any_of(
            &candidates,
            |t| parse_duration(t).map_err(PredicateError::from),
            v,
        ),
        Value::Boolean(v) => any_of(&candidates, parse_bool, v),
        Value::String(s) => satisfied(candidates.contains(&&**s)),
        other => Err(PredicateError::Unsupported(other.kind())),
    }
}

fn format(value: &Value<'_>, param: &str, formats: &FormatRegistry) -> PredicateResult {
    let Value::String(s) = value else {
        return Err(PredicateError::Unsupported(value.kind()));
    };

    match formats.check(param, s) {
        Some(ok) => satisfied(ok),
        None => Err(PredicateError::malformed(format!(
            "unknown format \"{param}\""
        ))),
    }
}
