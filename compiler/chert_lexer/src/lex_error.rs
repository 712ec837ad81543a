//! The one fatal lexer condition.

use std::fmt;

use chert_diagnostic::Span;

/// Raised when a string or character literal reaches a newline or end of
/// input before its closing quote.
///
/// The diagnostic has already been reported through the sink when this
/// is returned; the value itself only signals that scanning should stop.
/// Continuing past a broken literal would produce tokens that mislead
/// the parser into pointless follow-on errors, so callers are expected
/// to halt the translation unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnterminatedLiteral {
    pub span: Span,
}

impl fmt::Display for UnterminatedLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unterminated literal at {}", self.span)
    }
}

impl std::error::Error for UnterminatedLiteral {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_the_span() {
        let err = UnterminatedLiteral {
            span: Span::new(4, 10),
        };
        assert_eq!(err.to_string(), "unterminated literal at 4..10");
    }
}
