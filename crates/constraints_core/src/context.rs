//! Evaluation options and batch reports.

/// Options controlling how expressions are evaluated.
///
/// The default is the strict dialect: authoring mistakes such as unknown rule
/// names or malformed parameters surface as syntax errors. The lenient
/// dialect skips them as satisfied instead.
///
/// # Example
///
/// ```rust
/// use constraints_core::ValidationContext;
///
/// let context = ValidationContext::new().with_strict(false);
/// assert!(!context.strict);
/// assert!(!context.allow_trailing_dive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// Unknown rules/formats, malformed parameters, rules applied to an
    /// unsupported kind and dives that do not match the value's shape are
    /// syntax errors when set; they are skipped otherwise
    pub strict: bool,

    /// Whether a bare trailing `>` with nothing after it is accepted
    pub allow_trailing_dive: bool,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            strict: true,
            allow_trailing_dive: false,
        }
    }
}

impl ValidationContext {
    /// Creates a strict validation context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context for the lenient dialect.
    pub fn lenient() -> Self {
        Self {
            strict: false,
            allow_trailing_dive: true,
        }
    }

    /// Sets strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Allows or rejects a trailing dive operator.
    pub fn with_trailing_dive(mut self, allow: bool) -> Self {
        self.allow_trailing_dive = allow;
        self
    }
}

/// Outcome of validating several documents.
///
/// Each document is validated fail-fast, so a failing document contributes
/// exactly one error. Expressions rejected before any document is looked at
/// are counted apart from failing documents.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Whether every document passed
    pub passed: bool,

    /// One entry per failing document or rejected expression
    pub errors: Vec<String>,

    /// Validation statistics
    pub stats: ValidationStats,
}

/// Statistics about a batch run.
#[derive(Debug, Clone, Default)]
pub struct ValidationStats {
    /// Number of documents validated
    pub records_validated: usize,

    /// Number of documents that failed
    pub records_failed: usize,

    /// Number of malformed expressions that stopped the run
    pub expressions_rejected: usize,

    /// Validation duration in milliseconds
    pub duration_ms: u64,
}

impl ValidationReport {
    /// Creates a new successful validation report.
    pub fn success() -> Self {
        Self {
            passed: true,
            errors: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Records a validated document.
    pub fn record_passed(&mut self) {
        self.stats.records_validated += 1;
    }

    /// Records a failing document.
    pub fn record_failed(&mut self, error: impl Into<String>) {
        self.stats.records_validated += 1;
        self.stats.records_failed += 1;
        self.errors.push(error.into());
        self.passed = false;
    }

    /// Records a malformed expression; no document counts as validated.
    pub fn record_rejected(&mut self, error: impl Into<String>) {
        self.stats.expressions_rejected += 1;
        self.errors.push(error.into());
        self.passed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_strict() {
        let context = ValidationContext::default();
        assert!(context.strict);
        assert!(!context.allow_trailing_dive);
        assert_eq!(context, ValidationContext::new());
    }

    #[test]
    fn test_lenient() {
        let context = ValidationContext::lenient();
        assert!(!context.strict);
        assert!(context.allow_trailing_dive);
        assert_eq!(context.with_trailing_dive(false).allow_trailing_dive, false);
    }

    #[test]
    fn test_report_counts() {
        let mut report = ValidationReport::success();
        report.record_passed();
        report.record_failed("document 1: bad");
        assert!(!report.passed);
        assert_eq!(report.errors, vec!["document 1: bad".to_string()]);
        assert_eq!(report.stats.records_validated, 2);
        assert_eq!(report.stats.records_failed, 1);
        assert_eq!(report.stats.expressions_rejected, 0);
    }

    #[test]
    fn test_rejected_expressions_fail_without_documents() {
        let mut report = ValidationReport::success();
        report.record_rejected("bad expression");
        assert!(!report.passed);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.stats.expressions_rejected, 1);
        assert_eq!(report.stats.records_validated, 0);
    }
}
