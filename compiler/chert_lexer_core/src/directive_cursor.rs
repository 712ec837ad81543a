//! A newline-bounded view over the base cursor.
//!
//! A preprocessing directive occupies exactly one logical line: line
//! splicing is handled underneath by [`Cursor`], so any newline this
//! layer can see is a raw one and terminates the directive. Directive
//! parsing runs over this cursor and therefore cannot spill across a
//! logical-line boundary.

use crate::{CodeBuffer, Cursor};

/// Cursor over the current logical line; end-of-input at a raw newline.
#[derive(Clone, Copy, Debug)]
pub struct DirectiveCursor {
    inner: Cursor,
}

impl DirectiveCursor {
    pub fn new(inner: Cursor) -> Self {
        DirectiveCursor { inner }
    }

    /// Byte offset of the next character.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.inner.offset()
    }

    /// `true` at the underlying end or at a raw newline.
    pub fn at_end(&self, buf: &CodeBuffer) -> bool {
        match self.inner.peek(buf) {
            None => true,
            Some('\n' | '\r') => true,
            Some(_) => false,
        }
    }

    /// Next character without advancing; `None` at end of line.
    pub fn peek(&self, buf: &CodeBuffer) -> Option<char> {
        match self.inner.peek(buf) {
            Some('\n' | '\r') | None => None,
            ch => ch,
        }
    }

    /// Consume one character; `None` at end of line.
    pub fn bump(&mut self, buf: &CodeBuffer) -> Option<(char, u32)> {
        if self.at_end(buf) {
            return None;
        }
        self.inner.bump(buf)
    }

    /// `true` if the rest of the line starts with `pattern` (ASCII only).
    pub fn looking_at(&self, buf: &CodeBuffer, pattern: &str) -> bool {
        let mut probe = *self;
        pattern
            .chars()
            .all(|expected| probe.bump(buf).is_some_and(|(ch, _)| ch == expected))
    }

    /// Consume everything up to the end of the line.
    pub fn skip_rest(&mut self, buf: &CodeBuffer) {
        self.inner.skip_to_raw_newline(buf);
    }

    /// Release the underlying cursor, positioned where parsing stopped.
    pub fn into_inner(self) -> Cursor {
        self.inner
    }
}
