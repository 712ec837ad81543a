//! The keyword table: 36 entries, matched by exact bytes.

use crate::token::Keyword;

/// Sorted by byte order (`_` sorts before the lowercase letters), so the
/// lookup can binary-search.
pub(crate) const KEYWORDS: &[(&str, Keyword)] = &[
    ("_Bool", Keyword::Bool),
    ("_Complex", Keyword::Complex),
    ("_Imaginary", Keyword::Imaginary),
    ("auto", Keyword::Auto),
    ("break", Keyword::Break),
    ("case", Keyword::Case),
    ("char", Keyword::Char),
    ("const", Keyword::Const),
    ("continue", Keyword::Continue),
    ("default", Keyword::Default),
    ("do", Keyword::Do),
    ("double", Keyword::Double),
    ("else", Keyword::Else),
    ("enum", Keyword::Enum),
    ("extern", Keyword::Extern),
    ("float", Keyword::Float),
    ("for", Keyword::For),
    ("goto", Keyword::Goto),
    ("if", Keyword::If),
    ("inline", Keyword::Inline),
    ("int", Keyword::Int),
    ("long", Keyword::Long),
    ("register", Keyword::Register),
    ("restrict", Keyword::Restrict),
    ("return", Keyword::Return),
    ("signed", Keyword::Signed),
    ("sizeof", Keyword::Sizeof),
    ("static", Keyword::Static),
    ("struct", Keyword::Struct),
    ("switch", Keyword::Switch),
    ("typedef", Keyword::Typedef),
    ("union", Keyword::Union),
    ("unsigned", Keyword::Unsigned),
    ("void", Keyword::Void),
    ("volatile", Keyword::Volatile),
    ("while", Keyword::While),
];

/// Keyword for `text`, or `None` if it is an ordinary identifier.
/// Case-sensitive exact match.
pub(crate) fn lookup(text: &str) -> Option<Keyword> {
    KEYWORDS
        .binary_search_by(|&(kw, _)| kw.cmp(text))
        .ok()
        .map(|i| KEYWORDS[i].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_complete() {
        assert_eq!(KEYWORDS.len(), 36);
        for window in KEYWORDS.windows(2) {
            assert!(
                window[0].0 < window[1].0,
                "table out of order at {:?}",
                window[1].0
            );
        }
    }

    #[test]
    fn every_keyword_resolves() {
        for &(text, kw) in KEYWORDS {
            assert_eq!(lookup(text), Some(kw), "lookup failed for {text:?}");
        }
    }

    #[test]
    fn identifiers_do_not_resolve() {
        for text in ["foo", "Int", "INT", "whilee", "whil", "", "_bool", "short"] {
            assert_eq!(lookup(text), None, "{text:?} should not be a keyword");
        }
    }

    #[test]
    fn underscore_keywords_are_case_sensitive() {
        assert_eq!(lookup("_Bool"), Some(Keyword::Bool));
        assert_eq!(lookup("_BOOL"), None);
        assert_eq!(lookup("_Complex"), Some(Keyword::Complex));
        assert_eq!(lookup("_Imaginary"), Some(Keyword::Imaginary));
    }
}
