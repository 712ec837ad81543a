//! The number-literal scanner.
//!
//! A small state machine over one spelling buffer: determine the base,
//! consume integer part, fraction, and exponent, then validate the
//! suffix. The spelling is returned verbatim, suffix included; nothing
//! is converted to a numeric value here.
//!
//! On any error the scanner consumes through the end of the malformed
//! literal (including trailing alphanumeric garbage where the grammar
//! says so), reports with the range from the literal's start to the
//! current offset, and yields `None`.


use chert_diagnostic::{Diagnostic, ErrorSink, Span};
use chert_lexer_core::CharSource;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Base {
    Decimal,
    Hexadecimal,
}

fn is_digit(ch: char, base: Base) -> bool {
    match base {
        Base::Decimal => ch.is_ascii_digit(),
        Base::Hexadecimal => ch.is_ascii_hexdigit(),
    }
}

fn is_octal_digit(ch: char) -> bool {
    ('0'..='7').contains(&ch)
}

fn is_exponent_intro(ch: Option<char>, base: Base) -> bool {
    match (ch, base) {
        (Some('e' | 'E'), Base::Decimal) => true,
        (Some('p' | 'P'), Base::Hexadecimal) => true,
        _ => false,
    }
}

/// Error range for the literal. Offsets can arrive unordered when the
/// spelling crosses an expansion-section boundary; normalize so
/// `start <= end` always holds.
fn literal_span(start: u32, end: u32) -> Span {
    Span::new(start.min(end), start.max(end))
}

/// Scan one number literal. The source stands on a digit, or on a `.`
/// that the caller has verified is followed by a digit. `start` is the
/// literal's first byte offset.
pub(crate) fn scan_number<S: CharSource>(
    src: &mut S,
    sink: &ErrorSink,
    start: u32,
) -> Option<String> {
    let mut spelling = String::new();
    let mut base = Base::Decimal;
    let mut has_integer_part = false;

    // A leading `0x`/`0X` switches to hexadecimal.
    if src.peek() == Some('0') {
        src.ignore();
        spelling.push('0');
        has_integer_part = true;
        if let Some(x @ ('x' | 'X')) = src.peek() {
            src.ignore();
            spelling.push(x);
            base = Base::Hexadecimal;
            has_integer_part = false;
        }
    }

    // Even a number starting with 0 may turn out to be a decimal float
    // (0987.654 is valid), so octal is decided only after the digits.
    while let Some(d) = src.peek() {
        if !is_digit(d, base) {
            break;
        }
        src.ignore();
        spelling.push(d);
        has_integer_part = true;
    }

    if src.peek() != Some('.') {
        if is_exponent_intro(src.peek(), base) {
            scan_exponent(src, sink, start, &mut spelling)?;
            return scan_float_suffixes(src, sink, start, spelling);
        }
        if base == Base::Decimal
            && spelling.starts_with('0')
            && !spelling.chars().all(is_octal_digit)
        {
            sink.report(
                Diagnostic::error("Invalid octal number.", literal_span(start, src.offset()))
                    .with_hint("Invalid octal number."),
            );
            return None;
        }
        return scan_integer_suffixes(src, sink, start, spelling);
    }

    src.ignore();
    spelling.push('.');
    let mut has_fraction_part = false;
    while let Some(d) = src.peek() {
        if !is_digit(d, base) {
            break;
        }
        src.ignore();
        spelling.push(d);
        has_fraction_part = true;
    }

    if !has_integer_part && !has_fraction_part {
        // A bare `.` followed by non-digit garbage. The lexer's dispatch
        // only sends `.` here when a digit follows, so this is a guard.
        skip_alnum(src, &mut spelling);
        sink.report(Diagnostic::error(
            "Invalid number.",
            literal_span(start, src.offset()),
        ));
        return None;
    }

    if is_exponent_intro(src.peek(), base) {
        scan_exponent(src, sink, start, &mut spelling)?;
        return scan_float_suffixes(src, sink, start, spelling);
    }
    if base == Base::Hexadecimal {
        // A hex float must have an exponent.
        skip_alnum(src, &mut spelling);
        sink.report(
            Diagnostic::error(
                format!("Hexadecimal floating point {spelling} has no exponent part."),
                literal_span(start, src.offset()),
            )
            .with_hint("Hex float has no exponent part."),
        );
        return None;
    }
    scan_float_suffixes(src, sink, start, spelling)
}

/// `e`/`E`/`p`/`P`, an optional sign, then a mandatory digit run.
fn scan_exponent<S: CharSource>(
    src: &mut S,
    sink: &ErrorSink,
    start: u32,
    spelling: &mut String,
) -> Option<()> {
    if let Some(intro) = src.get() {
        spelling.push(intro);
    }
    if let Some(sign @ ('+' | '-')) = src.peek() {
        src.ignore();
        spelling.push(sign);
    }

    let mut has_digit = false;
    while let Some(d) = src.peek() {
        if !d.is_ascii_digit() {
            break;
        }
        src.ignore();
        spelling.push(d);
        has_digit = true;
    }

    if !has_digit {
        skip_alnum(src, spelling);
        sink.report(
            Diagnostic::error(
                format!("Exponent part of number literal {spelling} has no digit."),
                literal_span(start, src.offset()),
            )
            .with_hint("Exponent has no digit."),
        );
        return None;
    }
    Some(())
}

/// `(u|U)?(ll|LL|l|L)?` in either order, at most one of each kind;
/// `ll`/`LL` are tried before `l`/`L`.
fn valid_integer_suffix(suffix: &str) -> bool {
    let bytes = suffix.as_bytes();
    let mut i = 0;
    let mut seen_unsigned = false;
    let mut seen_long = false;
    while i < bytes.len() {
        if !seen_unsigned && (bytes[i] == b'u' || bytes[i] == b'U') {
            seen_unsigned = true;
            i += 1;
        } else if !seen_long && (bytes[i..].starts_with(b"ll") || bytes[i..].starts_with(b"LL")) {
            seen_long = true;
            i += 2;
        } else if !seen_long && (bytes[i] == b'l' || bytes[i] == b'L') {
            seen_long = true;
            i += 1;
        } else {
            return false;
        }
    }
    true
}

/// Zero or one of `f`, `F`, `l`, `L`.
fn valid_float_suffix(suffix: &str) -> bool {
    suffix.is_empty()
        || (suffix.len() == 1 && matches!(suffix.as_bytes()[0], b'f' | b'F' | b'l' | b'L'))
}

fn scan_integer_suffixes<S: CharSource>(
    src: &mut S,
    sink: &ErrorSink,
    start: u32,
    mut spelling: String,
) -> Option<String> {
    let suffix_at = collect_alpha_run(src, &mut spelling);
    if valid_integer_suffix(&spelling[suffix_at..]) {
        Some(spelling)
    } else {
        report_invalid_suffix(sink, start, src.offset(), &spelling, suffix_at);
        None
    }
}

fn scan_float_suffixes<S: CharSource>(
    src: &mut S,
    sink: &ErrorSink,
    start: u32,
    mut spelling: String,
) -> Option<String> {
    let suffix_at = collect_alpha_run(src, &mut spelling);
    if valid_float_suffix(&spelling[suffix_at..]) {
        Some(spelling)
    } else {
        report_invalid_suffix(sink, start, src.offset(), &spelling, suffix_at);
        None
    }
}

/// Consume the alphabetic run that might be a suffix; returns the index
/// where it starts inside the spelling.
fn collect_alpha_run<S: CharSource>(src: &mut S, spelling: &mut String) -> usize {
    let at = spelling.len();
    while let Some(ch) = src.peek() {
        if !ch.is_ascii_alphabetic() {
            break;
        }
        src.ignore();
        spelling.push(ch);
    }
    at
}

fn skip_alnum<S: CharSource>(src: &mut S, spelling: &mut String) {
    while let Some(ch) = src.peek() {
        if !ch.is_ascii_alphanumeric() {
            break;
        }
        src.ignore();
        spelling.push(ch);
    }
}

fn report_invalid_suffix(sink: &ErrorSink, start: u32, end: u32, spelling: &str, suffix_at: usize) {
    sink.report(
        Diagnostic::error(
            format!(
                "\"{}\" is not a valid suffix for the number literal {}.",
                &spelling[suffix_at..],
                &spelling[..suffix_at]
            ),
            literal_span(start, end),
        )
        .with_hint("invalid suffix."),
    );
}
