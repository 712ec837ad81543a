//! Diagnostics for the chert C front end.
//!
//! Every diagnostic carries a byte [`Span`] into the code buffer, a
//! human-readable message, and an optional short hint. Components never
//! render diagnostics themselves; they append them to an [`ErrorSink`]
//! and keep going (or, for the one fatal lexer case, raise after
//! reporting).
//!
//! The sink is an append-only collector. It does not deduplicate, sort,
//! or limit — the emission order is deterministic for a given input and
//! is part of the observable contract.

mod diagnostic;
mod sink;
mod span;

pub use diagnostic::{Diagnostic, Severity};
pub use sink::ErrorSink;
pub use span::Span;
