//! Fully parsed expressions, every level of every dive.
//!
//! The evaluator splits lazily, one level per value it visits. Tools that
//! need to look at a whole expression up front (syntax checks, explanations)
//! parse it eagerly into an [`Expression`] tree instead.

use crate::{RuleSet, Splitter, parse_rules};
use constraints_core::SyntaxError;

/// One level of an expression, with the levels it dives into.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expression {
    /// Rules for this level
    pub rules: RuleSet,
    /// Expression applied to mapping keys
    pub key: Option<Box<Expression>>,
    /// Expression applied to elements, mapping values or the pointee
    pub next: Option<Box<Expression>>,
}

impl Expression {
    /// Number of levels along the dive chain, this one included.
    pub fn depth(&self) -> usize {
        1 + self.next.as_ref().map_or(0, |next| next.depth())
    }

    /// Visits every rule set in the tree, depth first, keys before dives.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a RuleSet)) {
        f(&self.rules);
        if let Some(key) = &self.key {
            key.visit(f);
        }
        if let Some(next) = &self.next {
            next.visit(f);
        }
    }
}

/// Parses every level of an expression, rejecting a trailing dive.
///
/// # Example
///
/// ```rust
/// use constraints_parser::parse_expression;
///
/// let parsed = parse_expression("gte=1 [empty=false] > nil=false > gte=0").unwrap();
/// assert_eq!(parsed.depth(), 3);
/// assert!(parsed.key.is_some());
/// ```
pub fn parse_expression(expression: &str) -> Result<Expression, SyntaxError> {
    parse_with(&Splitter::default(), expression)
}

/// Parses every level of an expression with a configured splitter.
pub fn parse_with(splitter: &Splitter, expression: &str) -> Result<Expression, SyntaxError> {
    let split = splitter.split(expression)?;
    let rules = parse_rules(&split.value)?;

    let key = if split.has_key() {
        Some(Box::new(parse_with(splitter, split.key)?))
    } else {
        None
    };

    let next = if split.has_remainder() {
        Some(Box::new(parse_with(splitter, split.remainder)?))
    } else {
        None
    };

    Ok(Expression { rules, key, next })
}
