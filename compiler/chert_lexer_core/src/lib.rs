//! Low-level scanning layer for the chert C front end.
//!
//! This crate is the bottom of the pipeline and has no dependency on the
//! rest of the front end — it can be reused by external tools that need
//! to address preprocessed C source by byte offset.
//!
//! # Architecture
//!
//! - [`CodeBuffer`] — append-only byte storage divided into *sections*.
//!   Section 0 is the original translation unit; every macro expansion
//!   appends a new section. All diagnostics and cursors address the
//!   buffer by flat byte offset, which gives every character in the
//!   system a stable address.
//! - [`Cursor`] — a `Copy` forward scanner over the buffer with UTF-8
//!   decoding and transparent line splicing (`\`-newline elision).
//!   Lookahead is a cursor copy; there is no "unget".
//! - [`DirectiveCursor`] — a newline-bounded view used to parse one
//!   preprocessing directive line.
//! - [`SliceCursor`] — the same character surface over a raw byte slice
//!   (macro replacement lists), without splicing.
//! - [`CharSource`] — the character-stream trait the lexer consumes. In
//!   production it is implemented by the preprocessor; [`StrSource`] is
//!   the plain string-backed implementation used in tests.

mod char_source;
pub mod classify;
mod code_buffer;
mod cursor;
mod directive_cursor;
mod slice_cursor;
mod utf8;

pub use char_source::{CharSource, StrSource};
pub use code_buffer::{CodeBuffer, SectionId};
pub use cursor::Cursor;
pub use directive_cursor::DirectiveCursor;
pub use slice_cursor::SliceCursor;
