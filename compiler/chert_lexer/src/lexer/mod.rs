//! Top-level token dispatch.


use chert_diagnostic::{Diagnostic, ErrorSink, Span};
use chert_lexer_core::classify::{is_ident_continue, is_ident_start, is_whitespace};
use chert_lexer_core::CharSource;
use tracing::trace;

use crate::keywords;
use crate::lex_error::UnterminatedLiteral;
use crate::number;
use crate::punct;
use crate::quoted::{self, Body};
use crate::token::{LiteralPrefix, Token, TokenKind};

/// The lexer: a token producer over any character source.
///
/// In production the source is the preprocessor; tests drive it with a
/// raw [`StrSource`](chert_lexer_core::StrSource), in which case the
/// lexer also skips the comments the preprocessor would have elided.
pub struct Lexer<S> {
    src: S,
    sink: ErrorSink,
}

impl<S: CharSource> Lexer<S> {
    pub fn new(src: S, sink: ErrorSink) -> Self {
        Lexer { src, sink }
    }

    /// Produce the next token.
    ///
    /// - `Ok(Some(token))` on success; the final token is
    ///   [`TokenKind::Eof`].
    /// - `Ok(None)` after a recoverable lexical error: the diagnostic
    ///   has been reported and scanning advanced past the bad input, so
    ///   the caller may keep calling `next`.
    /// - `Err(_)` only for an unterminated string or character literal.
    pub fn next(&mut self) -> Result<Option<Token>, UnterminatedLiteral> {
        loop {
            while let Some(ch) = self.src.peek() {
                if !is_whitespace(ch) {
                    break;
                }
                self.src.ignore();
            }

            let start = self.src.offset();
            let Some(ch) = self.src.peek() else {
                return Ok(Some(Token::new(TokenKind::Eof, Span::point(start))));
            };

            // Comment forms only reach the lexer when it runs without
            // the preprocessor. A line comment's newline is consumed
            // with it; an unterminated block comment is not reported
            // here — the preprocessor is the comment authority.
            if self.src.looking_at("//") {
                self.src.ignore_n(2);
                while let Some(ch) = self.src.get() {
                    if ch == '\n' {
                        break;
                    }
                }
                continue;
            }
            if self.src.looking_at("/*") {
                self.src.ignore_n(2);
                loop {
                    if self.src.looking_at("*/") {
                        self.src.ignore_n(2);
                        break;
                    }
                    if self.src.get().is_none() {
                        break;
                    }
                }
                continue;
            }

            if is_ident_start(ch) {
                let ident = self.read_identifier();
                // An identifier glued to a quote is a literal prefix.
                if let Some(delim @ ('"' | '\'')) = self.src.peek() {
                    return self.prefixed_literal(start, ident, delim);
                }
                let span = self.span_from(start);
                let kind = match keywords::lookup(&ident) {
                    Some(keyword) => TokenKind::Keyword(keyword),
                    None => TokenKind::Ident(ident),
                };
                return Ok(Some(Token::new(kind, span)));
            }

            if ch == '"' || ch == '\'' {
                return self.literal(start, LiteralPrefix::None, ch);
            }

            if ch == '.' && matches!(self.src.peek_nth(1), Some(d) if d.is_ascii_digit()) {
                return Ok(self.number(start));
            }
            if ch.is_ascii_digit() {
                return Ok(self.number(start));
            }

            if let Some(p) = punct::match_punct(&mut self.src) {
                let span = self.span_from(start);
                return Ok(Some(Token::new(TokenKind::Punct(p), span)));
            }

            // Nothing matched: a stray character. Report, step over it,
            // and let the caller continue.
            self.src.ignore();
            let span = self.span_from(start);
            trace!(ch = %ch, "stray character");
            self.sink.report(
                Diagnostic::error(format!("Stray \"{ch}\" in program."), span)
                    .with_hint("Invalid character."),
            );
            return Ok(None);
        }
    }

    /// Span from `start` to the current offset. A token that crosses an
    /// expansion-section boundary can see offsets jump backwards; the
    /// span is normalized so `start <= end` always holds.
    fn span_from(&mut self, start: u32) -> Span {
        let end = self.src.offset();
        Span::new(start.min(end), start.max(end))
    }

    fn read_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(ch) = self.src.peek() {
            if !is_ident_continue(ch) {
                break;
            }
            self.src.ignore();
            ident.push(ch);
        }
        ident
    }

    fn number(&mut self, start: u32) -> Option<Token> {
        let spelling = number::scan_number(&mut self.src, &self.sink, start)?;
        let span = self.span_from(start);
        Some(Token::new(TokenKind::Number(spelling), span))
    }

    /// A literal whose opening quote is at the source head; `start` is
    /// the token start (the prefix start, if there was one).
    fn literal(
        &mut self,
        start: u32,
        prefix: LiteralPrefix,
        delim: char,
    ) -> Result<Option<Token>, UnterminatedLiteral> {
        self.src.ignore(); // opening quote
        match quoted::scan_body(&mut self.src, delim) {
            Body::Terminated(body) => {
                let span = self.span_from(start);
                let kind = if delim == '"' {
                    TokenKind::Str { body, prefix }
                } else {
                    TokenKind::CharLit { body, prefix }
                };
                Ok(Some(Token::new(kind, span)))
            }
            Body::Unterminated => Err(self.raise_unterminated(start, delim)),
        }
    }

    /// An identifier directly followed by a quote: `L` is the one valid
    /// prefix. Anything else — including the C11 prefixes `u8`, `u`,
    /// `U` — skips the whole literal for recovery and reports.
    fn prefixed_literal(
        &mut self,
        start: u32,
        prefix: String,
        delim: char,
    ) -> Result<Option<Token>, UnterminatedLiteral> {
        if prefix == "L" {
            return self.literal(start, LiteralPrefix::Wide, delim);
        }

        self.src.ignore(); // opening quote
        let body = quoted::scan_body(&mut self.src, delim);
        let span = self.span_from(start);
        self.sink.report(
            Diagnostic::error(
                format!(
                    "\"{prefix}\" is not a valid prefix for a {} literal.",
                    literal_noun(delim)
                ),
                span,
            )
            .with_hint("Invalid prefix."),
        );
        match body {
            Body::Terminated(_) => Ok(None),
            Body::Unterminated => Err(self.raise_unterminated(start, delim)),
        }
    }

    fn raise_unterminated(&mut self, start: u32, delim: char) -> UnterminatedLiteral {
        let span = self.span_from(start);
        self.sink.report(
            Diagnostic::error(
                format!("The {} literal has no ending quote.", literal_noun(delim)),
                span,
            )
            .with_hint("No ending quote."),
        );
        UnterminatedLiteral { span }
    }
}

fn literal_noun(delim: char) -> &'static str {
    if delim == '"' {
        "string"
    } else {
        "character"
    }
}
