//! Punctuator recognition: longest match, tried in descending length.

use chert_lexer_core::CharSource;

use crate::token::Punct;

/// Candidates in match order: all three-character punctuators, then
/// two-character (digraphs included), then single characters. Because
/// the scan tries them in this order, `<<=` wins over `<<` wins over
/// `<`.
pub(crate) const PUNCTUATORS: &[(&str, Punct)] = &[
    ("<<=", Punct::ShlEqual),
    (">>=", Punct::ShrEqual),
    ("...", Punct::Ellipsis),
    ("<:", Punct::LessColon),
    (":>", Punct::ColonGreater),
    ("<%", Punct::LessPercent),
    ("%>", Punct::PercentGreater),
    ("->", Punct::Arrow),
    ("++", Punct::PlusPlus),
    ("--", Punct::MinusMinus),
    ("<<", Punct::Shl),
    (">>", Punct::Shr),
    ("<=", Punct::LessEqual),
    (">=", Punct::GreaterEqual),
    ("==", Punct::EqualEqual),
    ("!=", Punct::BangEqual),
    ("&&", Punct::AmpAmp),
    ("||", Punct::PipePipe),
    ("*=", Punct::StarEqual),
    ("/=", Punct::SlashEqual),
    ("%=", Punct::PercentEqual),
    ("+=", Punct::PlusEqual),
    ("-=", Punct::MinusEqual),
    ("&=", Punct::AmpEqual),
    ("^=", Punct::CaretEqual),
    ("|=", Punct::PipeEqual),
    ("[", Punct::LeftBracket),
    ("]", Punct::RightBracket),
    ("(", Punct::LeftParen),
    (")", Punct::RightParen),
    ("{", Punct::LeftBrace),
    ("}", Punct::RightBrace),
    (".", Punct::Dot),
    ("&", Punct::Amp),
    ("*", Punct::Star),
    ("+", Punct::Plus),
    ("-", Punct::Minus),
    ("~", Punct::Tilde),
    ("!", Punct::Bang),
    ("/", Punct::Slash),
    ("%", Punct::Percent),
    ("<", Punct::Less),
    (">", Punct::Greater),
    ("^", Punct::Caret),
    ("|", Punct::Pipe),
    ("?", Punct::Question),
    (":", Punct::Colon),
    (";", Punct::Semicolon),
    ("=", Punct::Equal),
    (",", Punct::Comma),
];

/// Try to match a punctuator at the source head; consumes exactly the
/// matched characters.
pub(crate) fn match_punct<S: CharSource>(src: &mut S) -> Option<Punct> {
    for &(text, punct) in PUNCTUATORS {
        if src.looking_at(text) {
            src.ignore_n(text.chars().count());
            return Some(punct);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chert_lexer_core::StrSource;

    #[test]
    fn candidates_are_ordered_by_descending_length() {
        for window in PUNCTUATORS.windows(2) {
            assert!(
                window[0].0.len() >= window[1].0.len(),
                "{:?} before {:?}",
                window[0].0,
                window[1].0
            );
        }
    }

    #[test]
    fn longest_match_wins() {
        let mut src = StrSource::new("<<=");
        assert_eq!(match_punct(&mut src), Some(Punct::ShlEqual));
        assert_eq!(src.offset(), 3);

        let mut src = StrSource::new("<<x");
        assert_eq!(match_punct(&mut src), Some(Punct::Shl));
        assert_eq!(src.offset(), 2);

        let mut src = StrSource::new("<x");
        assert_eq!(match_punct(&mut src), Some(Punct::Less));
        assert_eq!(src.offset(), 1);
    }

    #[test]
    fn digraphs_match() {
        for (text, expected) in [
            ("<:", Punct::LessColon),
            (":>", Punct::ColonGreater),
            ("<%", Punct::LessPercent),
            ("%>", Punct::PercentGreater),
        ] {
            let mut src = StrSource::new(text);
            assert_eq!(match_punct(&mut src), Some(expected));
        }
    }

    #[test]
    fn lone_colon_before_non_digraph() {
        let mut src = StrSource::new(":x");
        assert_eq!(match_punct(&mut src), Some(Punct::Colon));
    }

    #[test]
    fn no_match_leaves_source_untouched() {
        let mut src = StrSource::new("@");
        assert_eq!(match_punct(&mut src), None);
        assert_eq!(src.offset(), 0);
    }
}
