//! The chert C preprocessor.
//!
//! A character-level stream transformer over the sectioned
//! [`CodeBuffer`](chert_lexer_core::CodeBuffer): it elides comments,
//! collapses whitespace runs to single spaces, parses `#define` lines,
//! and performs recursive macro expansion with rescan. Output is a
//! stream of [`PpChar`]s — one code point plus the buffer offset it
//! originates from, however many expansion layers sit above it.
//!
//! Line splicing is invisible at this layer; the scanner underneath has
//! already elided every `\`-newline.
//!
//! # Expansion model
//!
//! Each macro expansion appends its replacement text to the code buffer
//! as a new *section* and pushes a frame onto the section stack; reading
//! continues inside the section, and identifiers found there are
//! themselves candidates for expansion (rescan). A frame carries a
//! [`HideSet`] of macro names that must not re-expand inside it, which
//! is what stops `#define R R` from recursing. Completed invocations are
//! memoized in an [`ExpansionCache`] keyed by the invocation spelling.

mod cache;
mod directive;
mod hide_set;
mod macro_table;
mod pp_char;
mod preprocessor;

pub use cache::{invocation_key, ExpansionCache};
pub use hide_set::HideSet;
pub use macro_table::{MacroDefinition, MacroKind, MacroTable};
pub use pp_char::PpChar;
pub use preprocessor::Preprocessor;
