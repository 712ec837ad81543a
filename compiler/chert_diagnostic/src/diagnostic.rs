//! The diagnostic value: severity, message, optional hint, and span.

use std::fmt;

use crate::Span;

/// Severity level of a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with its source range.
///
/// `span` is always a range into the code buffer (`start <= end`). The
/// `hint` is a short secondary line some errors carry (e.g. `invalid
/// suffix.`); most preprocessor diagnostics have none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub hint: Option<String>,
    pub span: Span,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            hint: None,
            span,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            hint: None,
            span,
        }
    }

    /// Attach a hint line.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// `true` if this is an error (not a warning).
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.severity, self.message, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_builder() {
        let d = Diagnostic::error("Invalid octal number.", Span::new(0, 4))
            .with_hint("Invalid octal number.");
        assert!(d.is_error());
        assert_eq!(d.message, "Invalid octal number.");
        assert_eq!(d.hint.as_deref(), Some("Invalid octal number."));
        assert_eq!(d.span, Span::new(0, 4));
    }

    #[test]
    fn warning_has_no_hint_by_default() {
        let d = Diagnostic::warning("Macro \"X\" redefined.", Span::new(8, 9));
        assert!(!d.is_error());
        assert_eq!(d.hint, None);
    }

    #[test]
    fn display_includes_severity_and_span() {
        let d = Diagnostic::error("Stray \"@\" in program.", Span::new(3, 4));
        assert_eq!(d.to_string(), "error: Stray \"@\" in program. [3..4]");
    }
}
