//! The append-only error sink shared by the preprocessor and the lexer.

use std::cell::RefCell;
use std::rc::Rc;

use crate::Diagnostic;

/// Append-only diagnostic collector.
///
/// The sink is a cheap cloneable handle: the preprocessor and the lexer
/// each hold a clone and report through it; the caller keeps one to read
/// the results. Diagnostics come out in emission order — the core never
/// deduplicates or sorts.
///
/// The handle is `Rc`-based and deliberately not `Send`: the whole front
/// end is strictly single-threaded.
#[derive(Clone, Default, Debug)]
pub struct ErrorSink {
    inner: Rc<RefCell<Vec<Diagnostic>>>,
}

impl ErrorSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one diagnostic.
    pub fn report(&self, diagnostic: Diagnostic) {
        self.inner.borrow_mut().push(diagnostic);
    }

    /// Number of diagnostics reported so far.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// `true` if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// `true` if at least one *error* (not warning) has been reported.
    pub fn has_errors(&self) -> bool {
        self.inner.borrow().iter().any(Diagnostic::is_error)
    }

    /// Snapshot of everything reported so far, in emission order.
    pub fn collected(&self) -> Vec<Diagnostic> {
        self.inner.borrow().clone()
    }

    /// Drain the sink, returning the diagnostics in emission order.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.inner.borrow_mut())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::Span;

    #[test]
    fn starts_empty() {
        let sink = ErrorSink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.len(), 0);
        assert!(!sink.has_errors());
    }

    #[test]
    fn preserves_emission_order() {
        let sink = ErrorSink::new();
        sink.report(Diagnostic::error("first", Span::new(0, 1)));
        sink.report(Diagnostic::error("second", Span::new(1, 2)));
        let all = sink.collected();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].message, "first");
        assert_eq!(all[1].message, "second");
    }

    #[test]
    fn clones_share_storage() {
        let sink = ErrorSink::new();
        let handle = sink.clone();
        handle.report(Diagnostic::error("via clone", Span::new(0, 0)));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.collected()[0].message, "via clone");
    }

    #[test]
    fn warnings_are_not_errors() {
        let sink = ErrorSink::new();
        sink.report(Diagnostic::warning("Macro \"X\" redefined.", Span::new(0, 1)));
        assert!(!sink.has_errors());
        sink.report(Diagnostic::error("Invalid octal number.", Span::new(0, 1)));
        assert!(sink.has_errors());
    }

    #[test]
    fn take_drains() {
        let sink = ErrorSink::new();
        sink.report(Diagnostic::error("only", Span::new(0, 1)));
        let drained = sink.take();
        assert_eq!(drained.len(), 1);
        assert!(sink.is_empty());
    }
}
