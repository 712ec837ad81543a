//! End-to-end tests: CodeBuffer → Preprocessor → Lexer.

#![allow(clippy::unwrap_used, reason = "test assertions")]

use chert_diagnostic::ErrorSink;
use chert_lexer::{Keyword, Lexer, LiteralPrefix, Punct, TokenKind};
use chert_lexer_core::CodeBuffer;
use chert_pp::Preprocessor;

fn lex_preprocessed(input: &str) -> (Vec<TokenKind>, ErrorSink) {
    let sink = ErrorSink::new();
    let pp = Preprocessor::new(CodeBuffer::new(input), sink.clone());
    let mut lexer = Lexer::new(pp, sink.clone());
    let mut kinds = Vec::new();
    loop {
        match lexer.next() {
            Ok(Some(token)) => {
                let eof = token.is_eof();
                kinds.push(token.kind);
                if eof {
                    break;
                }
            }
            Ok(None) => {}
            Err(_) => break,
        }
    }
    (kinds, sink)
}

fn lex_clean(input: &str) -> Vec<TokenKind> {
    let (kinds, sink) = lex_preprocessed(input);
    assert!(
        sink.is_empty(),
        "unexpected diagnostics: {:?}",
        sink.collected()
    );
    kinds
}

fn ident(text: &str) -> TokenKind {
    TokenKind::Ident(text.to_owned())
}

fn number(text: &str) -> TokenKind {
    TokenKind::Number(text.to_owned())
}

#[test]
fn object_macro_feeds_the_lexer() {
    assert_eq!(
        lex_clean("#define FOO 1\nint a = FOO"),
        [
            TokenKind::Keyword(Keyword::Int),
            ident("a"),
            TokenKind::Punct(Punct::Equal),
            number("1"),
            TokenKind::Eof
        ]
    );
}

#[test]
fn function_macro_feeds_the_lexer() {
    assert_eq!(
        lex_clean("#define DIV(foo, bar) ((foo) / (bar))\nDIV(4, 3)"),
        [
            TokenKind::Punct(Punct::LeftParen),
            TokenKind::Punct(Punct::LeftParen),
            number("4"),
            TokenKind::Punct(Punct::RightParen),
            TokenKind::Punct(Punct::Slash),
            TokenKind::Punct(Punct::LeftParen),
            number("3"),
            TokenKind::Punct(Punct::RightParen),
            TokenKind::Punct(Punct::RightParen),
            TokenKind::Eof
        ]
    );
}

#[test]
fn self_referential_macro_survives() {
    assert_eq!(lex_clean("#define R R\nR"), [ident("R"), TokenKind::Eof]);
}

#[test]
fn deferred_invocation_token_stream() {
    assert_eq!(
        lex_clean("#define FOO(x) BAR x\nFOO(FOO)(2)"),
        [
            ident("BAR"),
            ident("FOO"),
            TokenKind::Punct(Punct::LeftParen),
            number("2"),
            TokenKind::Punct(Punct::RightParen),
            TokenKind::Eof
        ]
    );
}

#[test]
fn empty_macro_separates_tokens() {
    assert_eq!(
        lex_clean("#define EMPTY\nEMPTY;"),
        [TokenKind::Punct(Punct::Semicolon), TokenKind::Eof]
    );
}

#[test]
fn number_literal_through_the_pipeline() {
    assert_eq!(lex_clean("0171uLL"), [number("0171uLL"), TokenKind::Eof]);
}

#[test]
fn comments_and_macros_mix() {
    assert_eq!(
        lex_clean("#define N 3 /* count */\nint x[N]; // fixed\n"),
        [
            TokenKind::Keyword(Keyword::Int),
            ident("x"),
            TokenKind::Punct(Punct::LeftBracket),
            number("3"),
            TokenKind::Punct(Punct::RightBracket),
            TokenKind::Punct(Punct::Semicolon),
            TokenKind::Eof
        ]
    );
}

#[test]
fn macro_names_inside_strings_survive() {
    assert_eq!(
        lex_clean("#define FOO 1\n\"FOO\" FOO"),
        [
            TokenKind::Str {
                body: "FOO".to_owned(),
                prefix: LiteralPrefix::None
            },
            number("1"),
            TokenKind::Eof
        ]
    );
}

#[test]
fn wide_literal_through_the_pipeline() {
    assert_eq!(
        lex_clean("L\"wide\" L'c'"),
        [
            TokenKind::Str {
                body: "wide".to_owned(),
                prefix: LiteralPrefix::Wide
            },
            TokenKind::CharLit {
                body: "c".to_owned(),
                prefix: LiteralPrefix::Wide
            },
            TokenKind::Eof
        ]
    );
}

#[test]
fn rescan_pulls_arguments_from_source_text() {
    assert_eq!(
        lex_clean("#define G F\n#define F(x) [x]\nG(3)"),
        [
            TokenKind::Punct(Punct::LeftBracket),
            number("3"),
            TokenKind::Punct(Punct::RightBracket),
            TokenKind::Eof
        ]
    );
}

#[test]
fn spliced_source_lexes_cleanly() {
    assert_eq!(
        lex_clean("#define BAR int\nBA\\\nR ma\\\nin;"),
        [
            TokenKind::Keyword(Keyword::Int),
            ident("main"),
            TokenKind::Punct(Punct::Semicolon),
            TokenKind::Eof
        ]
    );
}

#[test]
fn arity_error_leaves_identifier_token() {
    let (kinds, sink) = lex_preprocessed("#define F(a, b) a\nF(1)");
    assert_eq!(kinds, [ident("F"), TokenKind::Eof]);
    let diags = sink.collected();
    assert_eq!(diags.len(), 1);
    assert_eq!(
        diags[0].message,
        "The macro \"F\" requires 2 argument(s), but got 1."
    );
}

#[test]
fn unterminated_string_halts_the_pipeline() {
    let (kinds, sink) = lex_preprocessed("int x = \"oops");
    assert_eq!(
        kinds,
        [
            TokenKind::Keyword(Keyword::Int),
            ident("x"),
            TokenKind::Punct(Punct::Equal),
        ]
    );
    let diags = sink.collected();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "The string literal has no ending quote.");
}

#[test]
fn diagnostics_arrive_in_source_order() {
    // An unknown directive, then a bad suffix, then a stray character.
    let (kinds, sink) = lex_preprocessed("#pragma once\n4f @");
    assert_eq!(kinds, [TokenKind::Eof]);
    let messages: Vec<String> = sink.collected().into_iter().map(|d| d.message).collect();
    assert_eq!(
        messages,
        [
            "Unknown preprocessing directive pragma",
            "\"f\" is not a valid suffix for the number literal 4.",
            "Stray \"@\" in program.",
        ]
    );
}

#[test]
fn token_spans_point_into_expansions() {
    let sink = ErrorSink::new();
    let pp = Preprocessor::new(CodeBuffer::new("#define FOO 42\nFOO"), sink.clone());
    let mut lexer = Lexer::new(pp, sink);
    let token = lexer.next().unwrap().unwrap();
    assert_eq!(token.kind, number("42"));
    // The spelling came from the expansion section, which starts right
    // after the 18 source bytes.
    assert_eq!(token.span.to_range(), 18..20);
}

#[test]
fn small_program() {
    let source = "\
#define SIZE 16
#define AT(base, i) ((base) + (i))

static unsigned buf[SIZE];

int main(void) {
    for (int i = 0; i < SIZE; i++) {
        *AT(buf, i) = i * 2u;
    }
    return 0;
}
";
    let (kinds, sink) = lex_preprocessed(source);
    assert!(sink.is_empty(), "diagnostics: {:?}", sink.collected());
    // Spot-check shape rather than the full stream.
    assert_eq!(kinds.first(), Some(&TokenKind::Keyword(Keyword::Static)));
    assert!(kinds.contains(&number("16")));
    assert!(kinds.contains(&number("2u")));
    assert!(kinds.contains(&TokenKind::Keyword(Keyword::Return)));
    assert!(!kinds.contains(&ident("SIZE")));
    assert!(!kinds.contains(&ident("AT")));
    assert_eq!(kinds.last(), Some(&TokenKind::Eof));
}
