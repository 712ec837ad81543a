//! String and character literal body scanning.
//!
//! The body is preserved verbatim: a `\` takes the next character along
//! with it unconditionally (so `\"` does not close a string), and no
//! escape is decoded or validated here — `\j`, `\xz`, or an
//! out-of-range `\x` value are someone else's problem, found when the
//! literal's value is evaluated. Multibyte UTF-8 passes straight
//! through.

use chert_lexer_core::classify::is_literal_terminator;
use chert_lexer_core::CharSource;

pub(crate) enum Body {
    /// The closing quote was found and consumed.
    Terminated(String),
    /// A newline-class character or end of input arrived first.
    Unterminated,
}

/// Scan the body after the opening quote, through the closing `delim`.
pub(crate) fn scan_body<S: CharSource>(src: &mut S, delim: char) -> Body {
    let mut body = String::new();
    loop {
        match src.get() {
            None => return Body::Unterminated,
            Some(ch) if ch == delim => return Body::Terminated(body),
            Some(ch) if is_literal_terminator(ch) => return Body::Unterminated,
            Some('\\') => {
                body.push('\\');
                match src.get() {
                    Some(escaped) => body.push(escaped),
                    None => return Body::Unterminated,
                }
            }
            Some(ch) => body.push(ch),
        }
    }
}
