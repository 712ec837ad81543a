//! The base scanner: a `Copy` cursor over the code buffer.
//!
//! The cursor presents a forward character stream with UTF-8 decoding
//! and transparent line splicing: whenever it is positioned at `\`
//! followed by `\n` (or `\r\n`), both are silently skipped, recursively.
//! Splicing applies everywhere, including inside identifiers and macro
//! bodies; it is resolved below the lexer, so no downstream layer ever
//! sees a spliced newline.
//!
//! # Invariant
//!
//! The position is always *normalized*: it never rests on a splice
//! sequence. [`offset`](Cursor::offset) therefore reports the post-splice
//! position of the next character.
//!
//! # Lookahead
//!
//! The cursor is [`Copy`]. Consumers probe ahead by copying the cursor
//! and bumping the copy; committing is assigning the copy back. This
//! replaces any notion of "unget".


use crate::utf8;
use crate::{CodeBuffer, SectionId};

/// `Copy` forward scanner over a [`CodeBuffer`], bounded by a limit.
///
/// The limit pins the cursor to one section: a cursor over section 0
/// never runs into expansion sections appended later, and a cursor over
/// an expansion section stops at that section's end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    pos: u32,
    limit: u32,
}

impl Cursor {
    /// Cursor over the buffer as it currently stands, starting at 0.
    ///
    /// Intended for the freshly constructed buffer, before any expansion
    /// sections exist; the limit is captured now and does not grow.
    pub fn new(buf: &CodeBuffer) -> Self {
        let mut cursor = Cursor {
            pos: 0,
            limit: buf.len(),
        };
        cursor.skip_splices(buf);
        cursor
    }

    /// Cursor over one section, positioned at its start.
    pub fn over_section(buf: &CodeBuffer, id: SectionId) -> Self {
        let mut cursor = Cursor {
            pos: buf.section_start(id),
            limit: buf.section_end(id),
        };
        cursor.skip_splices(buf);
        cursor
    }

    /// Byte offset of the next character to be read (post-splice).
    #[inline]
    pub fn offset(&self) -> u32 {
        self.pos
    }

    /// The cursor's exclusive upper bound.
    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// `true` once every character up to the limit has been consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.limit
    }

    /// Reposition the cursor. The new offset is normalized.
    pub fn set_offset(&mut self, buf: &CodeBuffer, offset: u32) {
        self.pos = offset;
        self.skip_splices(buf);
    }

    /// Next character without advancing; `None` at the limit.
    pub fn peek(&self, buf: &CodeBuffer) -> Option<char> {
        let mut probe = *self;
        probe.bump(buf).map(|(ch, _)| ch)
    }

    /// Consume one character; returns it with its byte offset.
    pub fn bump(&mut self, buf: &CodeBuffer) -> Option<(char, u32)> {
        if self.at_end() {
            return None;
        }
        let offset = self.pos;
        let (ch, width) = utf8::decode(&buf.as_bytes()[self.pos as usize..self.limit as usize]);
        self.pos += width;
        self.skip_splices(buf);
        Some((ch, offset))
    }

    /// `true` if the upcoming characters spell `pattern` (ASCII only).
    pub fn looking_at(&self, buf: &CodeBuffer, pattern: &str) -> bool {
        let mut probe = *self;
        pattern
            .chars()
            .all(|expected| probe.bump(buf).is_some_and(|(ch, _)| ch == expected))
    }

    /// Advance to the next *raw* newline (`\n` or `\r`, or the limit),
    /// stepping over spliced ones. The newline itself is not consumed.
    ///
    /// Used to finish line comments and to abandon malformed directive
    /// lines; SIMD-accelerated via `memchr`.
    pub fn skip_to_raw_newline(&mut self, buf: &CodeBuffer) {
        let bytes = buf.as_bytes();
        let mut from = self.pos as usize;
        let limit = self.limit as usize;

        while let Some(found) = memchr::memchr2(b'\n', b'\r', &bytes[from..limit]) {
            let at = from + found;
            // `\`-LF and `\`-CRLF are splices, not line ends.
            let spliced = if bytes[at] == b'\n' {
                at >= 1 && bytes[at - 1] == b'\\'
            } else {
                at >= 1 && bytes[at - 1] == b'\\' && at + 1 < limit && bytes[at + 1] == b'\n'
            };
            if spliced {
                from = at + 1;
                continue;
            }
            self.pos = at as u32;
            return;
        }
        self.pos = self.limit;
    }

    /// Skip any run of splice sequences at the current position.
    fn skip_splices(&mut self, buf: &CodeBuffer) {
        let bytes = buf.as_bytes();
        loop {
            if self.pos + 1 >= self.limit || bytes[self.pos as usize] != b'\\' {
                return;
            }
            match bytes[self.pos as usize + 1] {
                b'\n' => self.pos += 2,
                b'\r' if self.pos + 2 < self.limit && bytes[self.pos as usize + 2] == b'\n' => {
                    self.pos += 3;
                }
                _ => return,
            }
        }
    }
}
