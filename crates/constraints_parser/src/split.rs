//! Splitting of one raw expression into its key, value and remainder parts.
//!
//! ```text
//! gte=2 [empty=false] > gte=0 & lte=10
//! ^^^^^  ^^^^^^^^^^^    ^^^^^^^^^^^^^^
//! value      key          remainder
//! ```
//!
//! Brackets nest, so a key expression can dive on its own: in
//! `[nil=false > empty=false] > nil=false` the key part is
//! `nil=false > empty=false`.

use constraints_core::{SyntaxError, ValidationContext};
use std::borrow::Cow;

/// One level of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Split<'a> {
    /// Expression for mapping keys (inside the top-level brackets)
    pub key: &'a str,
    /// Rules for the current level
    pub value: Cow<'a, str>,
    /// Expression for the next level (after the top-level `>`)
    pub remainder: &'a str,
    /// Whether a top-level `>` was found
    pub dive: bool,
}

impl Split<'_> {
    /// Returns true if the remainder holds more than whitespace.
    pub fn has_remainder(&self) -> bool {
        !self.remainder.trim().is_empty()
    }

    /// Returns true if the key expression holds more than whitespace.
    pub fn has_key(&self) -> bool {
        !self.key.trim().is_empty()
    }
}

/// Splits an expression, rejecting a trailing dive operator.
///
/// # Example
///
/// ```rust
/// use constraints_parser::split;
///
/// let parts = split("gte=2 [empty=false] > gte=0").unwrap();
/// assert_eq!(parts.key, "empty=false");
/// assert_eq!(parts.value, "gte=2   ");
/// assert_eq!(parts.remainder, " gte=0");
/// ```
pub fn split(expression: &str) -> Result<Split<'_>, SyntaxError> {
    Splitter::default().split(expression)
}

/// Bracket-depth splitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Splitter {
    allow_trailing_dive: bool,
}

impl Splitter {
    /// Creates a splitter that rejects a trailing dive operator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a splitter configured from a validation context.
    pub fn from_context(context: &ValidationContext) -> Self {
        Self {
            allow_trailing_dive: context.allow_trailing_dive,
        }
    }

    /// Accepts or rejects a `>` followed by nothing.
    pub fn allow_trailing_dive(mut self, allow: bool) -> Self {
        self.allow_trailing_dive = allow;
        self
    }

    /// Splits `expression` at the first top-level `>`.
    pub fn split<'a>(&self, expression: &'a str) -> Result<Split<'a>, SyntaxError> {
        let mut depth = 0usize;
        let mut bracket_start = 0;
        let mut bracket_end = None;
        let mut stop = expression.len();

        // Only ASCII bytes are matched, so every index is a char boundary.
        for (i, byte) in expression.bytes().enumerate() {
            match byte {
                b'>' if depth == 0 => {
                    stop = i;
                    break;
                }
                b'[' => {
                    if depth == 0 {
                        bracket_start = i;
                    }
                    depth += 1;
                }
                b']' => {
                    if depth == 0 {
                        return Err(SyntaxError::new(
                            expression,
                            &expression[i..],
                            "unexpected closing bracket",
                        ));
                    }
                    depth -= 1;
                    if depth == 0 {
                        bracket_end = Some(i);
                    }
                }
                _ => {}
            }
        }

        if depth > 0 {
            return Err(SyntaxError::new(
                expression,
                &expression[bracket_start..],
                "expected closing bracket",
            ));
        }

        let (key, value) = match bracket_end {
            Some(end) => {
                let before = &expression[..bracket_start];
                let after = &expression[end + 1..stop];
                let value = match (before.is_empty(), after.is_empty()) {
                    (true, _) => Cow::Borrowed(after),
                    (false, true) => Cow::Borrowed(before),
                    (false, false) => Cow::Owned(format!("{before} {after}")),
                };
                (&expression[bracket_start + 1..end], value)
            }
            None => ("", Cow::Borrowed(&expression[..stop])),
        };

        let dive = stop < expression.len();
        let remainder = if dive { &expression[stop + 1..] } else { "" };

        if dive && !self.allow_trailing_dive && remainder.trim().is_empty() {
            return Err(SyntaxError::new(
                expression,
                &expression[stop..],
                "expected expression after dive operator",
            ));
        }

        Ok(Split {
            key,
            value,
            remainder,
            dive,
        })
    }
}
