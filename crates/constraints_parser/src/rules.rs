//! Rule parsing: `gte=1 & lte=2 | eq=4` into OR-groups of AND-rules.
//!
//! `&` binds tighter than `|`. Parameters keep their internal whitespace so
//! list parameters such as `one_of=1, 2, 3` reach the predicate untouched.

use constraints_core::SyntaxError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static RULE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid rule name regex"));

/// One named check and its raw parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Rule name, e.g. `gte`
    pub name: String,
    /// Raw parameter, empty when the rule has no `=`
    pub param: String,
}

impl Rule {
    /// Creates a rule.
    pub fn new(name: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param: param.into(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.param.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}={}", self.name, self.param)
        }
    }
}

/// Ordered OR-groups, each an ordered sequence of AND-rules.
///
/// An empty rule set is trivially satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleSet {
    groups: Vec<Vec<Rule>>,
}

impl RuleSet {
    /// Creates a rule set from its OR-groups.
    pub fn new(groups: Vec<Vec<Rule>>) -> Self {
        Self { groups }
    }

    /// The OR-groups, in evaluation order.
    pub fn groups(&self) -> &[Vec<Rule>] {
        &self.groups
    }

    /// Every rule in every group.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.groups.iter().flatten()
    }

    /// Returns true if there is nothing to check.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of OR-groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            for (j, rule) in group.iter().enumerate() {
                if j > 0 {
                    f.write_str(" & ")?;
                }
                write!(f, "{rule}")?;
            }
        }
        Ok(())
    }
}

/// Parses a value expression into a [`RuleSet`].
///
/// # Example
///
/// ```rust
/// use constraints_parser::{parse_rules, Rule};
///
/// let rules = parse_rules("gte=1 & lte=2 | eq=4").unwrap();
/// assert_eq!(rules.len(), 2);
/// assert_eq!(rules.groups()[1], vec![Rule::new("eq", "4")]);
/// ```
pub fn parse_rules(expression: &str) -> Result<RuleSet, SyntaxError> {
    let mut groups = Vec::new();

    for group in expression.split('|') {
        let mut rules = Vec::new();
        for candidate in group.split('&') {
            if candidate.trim().is_empty() {
                continue;
            }

            let (name, param) = match candidate.split_once('=') {
                Some((name, param)) => (name.trim(), param.trim()),
                None => (candidate.trim(), ""),
            };

            if !RULE_NAME.is_match(name) {
                return Err(SyntaxError::new(
                    expression,
                    candidate.trim(),
                    "could not parse rule name",
                ));
            }

            rules.push(Rule::new(name, param));
        }

        if !rules.is_empty() {
            groups.push(rules);
        }
    }

    Ok(RuleSet { groups })
}
