//! Structural evaluator.
//!
//! The evaluator walks a value through its [`Inspect`] handle, splits the
//! expression attached to each level, applies the rules and dives into
//! record fields, sequence elements, mapping keys and values, and the
//! pointee of optionals. Evaluation is fail-fast: the first error ends it.

use crate::{PredicateError, Registry};
use constraints_core::{
    Error, Inspect, Result, Schema, SyntaxError, ValidationContext, ValidationError,
    ValidationReport, Value,
};
use constraints_parser::{Expression, Rule, RuleSet, Split, Splitter, parse_rules, parse_with};
use std::sync::LazyLock;
use std::time::Instant;
use tracing::{debug, trace, warn};

static DEFAULT: LazyLock<Validator> = LazyLock::new(Validator::default);

/// Validates a record (or a present optional holding one) with the built-in
/// predicates and the strict dialect.
///
/// # Example
///
/// ```rust
/// use constraints_core::{Field, Inspect, Value};
///
/// struct Server {
///     port: u16,
/// }
///
/// impl Inspect for Server {
///     fn inspect(&self) -> Value<'_> {
///         Value::record([Field::new("port", "gte=1024", &self.port)])
///     }
/// }
///
/// assert!(constraints_validator::validate(&Server { port: 8080 }).is_ok());
///
/// let err = constraints_validator::validate(&Server { port: 80 }).unwrap_err();
/// assert_eq!(err.field_name(), Some("port"));
/// ```
pub fn validate<T: Inspect + ?Sized>(root: &T) -> Result {
    DEFAULT.validate(root)
}

/// Evaluates constraint expressions against inspectable values.
///
/// A validator holds no per-call state. Build one, then share it.
///
/// # Example
///
/// ```rust
/// use constraints_core::ValidationContext;
/// use constraints_validator::{Registry, Validator};
///
/// let validator = Validator::with_registry(
///     Registry::new().with_format("upper", |s: &str| s.chars().all(char::is_uppercase)),
///     ValidationContext::new(),
/// );
///
/// assert!(validator.check_expression("empty=false > format=upper").is_ok());
/// assert!(validator.check_expression("format=lower").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Registry,
    context: ValidationContext,
    splitter: Splitter,
}

impl Validator {
    /// Creates a strict validator with the built-in predicates.
    pub fn new() -> Self {
        Self::with_registry(Registry::new(), ValidationContext::default())
    }

    /// Creates a validator with the built-in predicates and `context`.
    pub fn with_context(context: ValidationContext) -> Self {
        Self::with_registry(Registry::new(), context)
    }

    /// Creates a validator from a custom registry.
    pub fn with_registry(registry: Registry, context: ValidationContext) -> Self {
        Self {
            registry,
            splitter: Splitter::from_context(&context),
            context,
        }
    }

    /// The predicates this validator dispatches to.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The evaluation options.
    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Validates a record, or an optional holding one.
    ///
    /// Any other top-level shape, an absent optional included, is a syntax
    /// error.
    pub fn validate<T: Inspect + ?Sized>(&self, root: &T) -> Result {
        let is_record = match root.inspect() {
            Value::Record(_) => true,
            Value::Optional(Some(inner)) => matches!(inner.inspect(), Value::Record(_)),
            _ => false,
        };

        if !is_record {
            return Err(SyntaxError::new(
                "",
                root.type_name(),
                "not a record or record reference",
            )
            .into());
        }

        self.evaluate(&root, "", "")
    }

    /// Validates one value against one expression.
    ///
    /// Unlike [`Validator::validate`] the value may have any shape. `field`
    /// names the value in errors.
    pub fn evaluate(&self, node: &dyn Inspect, field: &str, expression: &str) -> Result {
        let split = self
            .splitter
            .split(expression)
            .map_err(|err| err.in_field(field))?;

        self.run_self_check(node)?;

        let rules = parse_rules(&split.value).map_err(|err| err.in_field(field))?;
        let value = node.inspect();

        if !rules.is_empty() {
            debug!(field, rules = %rules, kind = %value.kind(), "evaluating rule set");
            self.apply_rules(node, &value, &rules, expression)
                .map_err(|err| err.with_field(field))?;
        }

        self.dive(&value, &split, field, expression)
    }

    /// Validates every document, fail-fast per document, and aggregates the
    /// failures into a report.
    pub fn validate_batch<I>(&self, documents: I) -> ValidationReport
    where
        I: IntoIterator,
        I::Item: Inspect,
    {
        let start = Instant::now();
        let mut report = ValidationReport::success();

        for (index, document) in documents.into_iter().enumerate() {
            match self.validate(&document) {
                Ok(()) => report.record_passed(),
                Err(err) => {
                    debug!(index, error = %err, "document failed validation");
                    report.record_failed(format!("document {index}: {err}"));
                }
            }
        }

        report.stats.duration_ms = start.elapsed().as_millis() as u64;
        report
    }

    /// Parses every level of an expression without evaluating it.
    ///
    /// In the strict dialect unknown rule names and unknown format names are
    /// reported as well.
    pub fn check_expression(&self, expression: &str) -> std::result::Result<Expression, SyntaxError> {
        let parsed = parse_with(&self.splitter, expression)?;

        if self.context.strict {
            let mut problem = None;
            parsed.visit(&mut |rules: &RuleSet| {
                if problem.is_none() {
                    problem = rules
                        .rules()
                        .find_map(|rule| self.unknown_name(expression, rule));
                }
            });
            if let Some(err) = problem {
                return Err(err);
            }
        }

        Ok(parsed)
    }

    /// Checks every expression of a schema; errors carry the dotted field path.
    pub fn check_schema(&self, schema: &Schema) -> Vec<SyntaxError> {
        schema
            .expressions()
            .into_iter()
            .filter_map(|(path, expression)| {
                self.check_expression(expression)
                    .err()
                    .map(|err| err.in_field(&path))
            })
            .collect()
    }

    fn unknown_name(&self, expression: &str, rule: &Rule) -> Option<SyntaxError> {
        if !self.registry.contains(&rule.name) {
            return Some(SyntaxError::new(
                expression,
                rule.to_string(),
                "unknown validator",
            ));
        }
        if rule.name == "format" && !self.registry.formats().contains(&rule.param) {
            return Some(SyntaxError::new(
                expression,
                rule.to_string(),
                format!("unknown format \"{}\"", rule.param),
            ));
        }
        None
    }

    fn run_self_check(&self, node: &dyn Inspect) -> Result {
        let outcome = match node.self_check() {
            Some(check) => check.check(),
            None => match node.to_self_check() {
                Some(owned) => owned.check(),
                None => return Ok(()),
            },
        };

        outcome.map_err(Error::Custom)
    }

    /// OR over groups: the first passing group wins, otherwise the last
    /// group's error is returned. Syntax errors end evaluation at once.
    fn apply_rules(
        &self,
        node: &dyn Inspect,
        value: &Value<'_>,
        rules: &RuleSet,
        expression: &str,
    ) -> Result {
        let mut outcome = Ok(());

        for group in rules.groups() {
            outcome = group
                .iter()
                .try_for_each(|rule| self.apply_rule(node, value, rule, expression));

            let settled = match &outcome {
                Ok(()) => true,
                Err(err) => err.is_syntax(),
            };
            if settled {
                return outcome;
            }
        }

        outcome
    }

    fn apply_rule(
        &self,
        node: &dyn Inspect,
        value: &Value<'_>,
        rule: &Rule,
        expression: &str,
    ) -> Result {
        trace!(rule = %rule, "applying rule");

        let Some(predicate) = self.registry.get(&rule.name) else {
            return self.relax(SyntaxError::new(
                expression,
                rule.to_string(),
                "unknown validator",
            ));
        };

        match predicate(value, &rule.param, self.registry.formats()) {
            Ok(()) => Ok(()),
            Err(PredicateError::Violated) => {
                Err(ValidationError::new(node.type_name(), &rule.name, &rule.param).into())
            }
            Err(err) => self.relax(SyntaxError::new(
                expression,
                rule.to_string(),
                err.to_string(),
            )),
        }
    }

    /// Reports a syntax error in the strict dialect, skips it otherwise.
    fn relax(&self, err: SyntaxError) -> Result {
        if self.context.strict {
            return Err(err.into());
        }
        warn!(error = %err, "skipping rule");
        Ok(())
    }

    fn dive(&self, value: &Value<'_>, split: &Split<'_>, field: &str, expression: &str) -> Result {
        if split.has_key() && !matches!(value, Value::Mapping(_)) {
            self.unexpected(split.key, field, expression)?;
        }

        match value {
            Value::Record(fields) => {
                if split.has_remainder() {
                    self.unexpected(split.remainder, field, expression)?;
                }
                for child in fields {
                    debug!(field = child.name(), "diving into field");
                    self.evaluate(child.node(), child.name(), child.expression())
                        .map_err(|err| err.with_field(child.name()))?;
                }
                Ok(())
            }
            Value::Mapping(entries) => {
                debug!(field, entries = entries.len(), "diving into mapping");
                for (key, item) in entries {
                    self.evaluate(key.as_ref(), field, split.key)?;
                    self.evaluate(item.as_ref(), field, split.remainder)?;
                }
                Ok(())
            }
            Value::Sequence(elements) => {
                debug!(field, elements = elements.len(), "diving into sequence");
                elements
                    .iter()
                    .try_for_each(|element| self.evaluate(element.as_ref(), field, split.remainder))
            }
            Value::Optional(Some(inner)) => self.evaluate(inner.as_ref(), field, split.remainder),
            Value::Optional(None) => Ok(()),
            _ => {
                if split.has_remainder() {
                    self.unexpected(split.remainder, field, expression)?;
                }
                Ok(())
            }
        }
    }

    fn unexpected(&self, near: &str, field: &str, expression: &str) -> Result {
        self.relax(SyntaxError::new(expression, near, "unexpected expression").in_field(field))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
