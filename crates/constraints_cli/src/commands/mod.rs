pub mod check;
pub mod explain;
pub mod validate;

use constraints_core::ValidationContext;

/// Builds the evaluation options from the dialect flags.
pub fn context(lenient: bool, allow_trailing_dive: bool) -> ValidationContext {
    ValidationContext::new()
        .with_strict(!lenient)
        .with_trailing_dive(allow_trailing_dive || lenient)
}
