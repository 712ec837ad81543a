//! Directive-line parsing.
//!
//! A `#` introduces a directive iff it is the first non-whitespace
//! character of a logical line; the preprocessor's output pump checks
//! that and hands the cursor here. Parsing runs over a
//! [`DirectiveCursor`], so nothing in this module can read past the end
//! of the logical line. On return the main cursor stands after the
//! directive's terminating newline.
//!
//! Only `#define` is recognized in this core. Failed definitions
//! register nothing.


use chert_diagnostic::{Diagnostic, ErrorSink, Span};
use chert_lexer_core::classify::{is_directive_space, is_ident_continue, is_ident_start};
use chert_lexer_core::{CodeBuffer, Cursor, DirectiveCursor};
use tracing::debug;

use crate::macro_table::{MacroDefinition, MacroKind, MacroTable};

/// Parse one directive line. `cursor` must stand on the `#`.
pub(crate) fn handle_directive(
    buffer: &CodeBuffer,
    cursor: &mut Cursor,
    macros: &mut MacroTable,
    sink: &ErrorSink,
) {
    let mut dc = DirectiveCursor::new(*cursor);
    dc.bump(buffer); // the '#'
    skip_space_and_comments(buffer, &mut dc);

    if dc.at_end(buffer) {
        // `#` followed only by whitespace: a no-op line.
        finish(buffer, cursor, dc);
        return;
    }

    let name_start = dc.offset();
    let name = read_directive_token(buffer, &mut dc);
    let name_end = dc.offset();

    if name == "define" {
        parse_define(buffer, &mut dc, macros, sink);
    } else {
        sink.report(Diagnostic::error(
            format!("Unknown preprocessing directive {name}"),
            Span::new(name_start, name_end),
        ));
    }

    finish(buffer, cursor, dc);
}

/// Hand the cursor back, positioned past the line's newline.
fn finish(buffer: &CodeBuffer, cursor: &mut Cursor, mut dc: DirectiveCursor) {
    dc.skip_rest(buffer);
    *cursor = dc.into_inner();
    if cursor.peek(buffer) == Some('\r') {
        cursor.bump(buffer);
    }
    if cursor.peek(buffer) == Some('\n') {
        cursor.bump(buffer);
    }
}

/// Skip spaces, tabs, and comments inside the directive line.
///
/// A `//` comment runs to the end of the line. A `/*` comment that the
/// line ends before closing simply stops the skip; the directive parser
/// is not the comment authority.
fn skip_space_and_comments(buffer: &CodeBuffer, dc: &mut DirectiveCursor) {
    loop {
        match dc.peek(buffer) {
            Some(ch) if is_directive_space(ch) || ch == '\x0B' || ch == '\x0C' => {
                dc.bump(buffer);
            }
            Some('/') if dc.looking_at(buffer, "//") => {
                while dc.bump(buffer).is_some() {}
                return;
            }
            Some('/') if dc.looking_at(buffer, "/*") => {
                dc.bump(buffer);
                dc.bump(buffer);
                loop {
                    if dc.looking_at(buffer, "*/") {
                        dc.bump(buffer);
                        dc.bump(buffer);
                        break;
                    }
                    if dc.bump(buffer).is_none() {
                        return;
                    }
                }
            }
            _ => return,
        }
    }
}

/// The directive's name token: an identifier, or a single character for
/// things like `#1` so the unknown-directive message has something to
/// show.
fn read_directive_token(buffer: &CodeBuffer, dc: &mut DirectiveCursor) -> String {
    match dc.peek(buffer) {
        Some(ch) if is_ident_start(ch) => read_identifier(buffer, dc),
        _ => {
            let mut token = String::new();
            if let Some((ch, _)) = dc.bump(buffer) {
                token.push(ch);
            }
            token
        }
    }
}

fn read_identifier(buffer: &CodeBuffer, dc: &mut DirectiveCursor) -> String {
    let mut ident = String::new();
    while let Some(ch) = dc.peek(buffer) {
        if !is_ident_continue(ch) {
            break;
        }
        dc.bump(buffer);
        ident.push(ch);
    }
    ident
}

fn parse_define(
    buffer: &CodeBuffer,
    dc: &mut DirectiveCursor,
    macros: &mut MacroTable,
    sink: &ErrorSink,
) {
    skip_space_and_comments(buffer, dc);

    let Some(first) = dc.peek(buffer) else {
        sink.report(Diagnostic::error(
            "macro names must be identifiers",
            Span::point(dc.offset()),
        ));
        return;
    };
    if !is_ident_start(first) {
        let start = dc.offset();
        dc.bump(buffer);
        sink.report(Diagnostic::error(
            "macro names must be identifiers",
            Span::new(start, dc.offset()),
        ));
        dc.skip_rest(buffer);
        return;
    }

    let name_start = dc.offset();
    let name = read_identifier(buffer, dc);
    let name_span = Span::new(name_start, dc.offset());

    // The `(` of a function-like macro must follow the name with no
    // intervening whitespace; otherwise it belongs to the body.
    let (kind, params) = if dc.peek(buffer) == Some('(') {
        match parse_params(buffer, dc, &name, sink) {
            Ok(params) => (MacroKind::FunctionLike, params),
            Err(()) => {
                dc.skip_rest(buffer);
                return;
            }
        }
    } else {
        (MacroKind::ObjectLike, Vec::new())
    };

    skip_space_and_comments(buffer, dc);
    let Ok(body) = read_body(buffer, dc, sink) else {
        dc.skip_rest(buffer);
        return;
    };

    let def = MacroDefinition {
        name,
        kind,
        params,
        body,
    };
    register(def, name_span, macros, sink);
}

/// Parameter list of a function-like macro; `dc` stands on the `(`.
fn parse_params(
    buffer: &CodeBuffer,
    dc: &mut DirectiveCursor,
    macro_name: &str,
    sink: &ErrorSink,
) -> Result<Vec<String>, ()> {
    let err = |message: String, span: Span| {
        sink.report(Diagnostic::error(message, span));
        Err(())
    };

    dc.bump(buffer); // '('
    skip_space_and_comments(buffer, dc);

    if dc.peek(buffer) == Some(')') {
        dc.bump(buffer);
        return Ok(Vec::new());
    }

    let Some(first) = dc.peek(buffer) else {
        return err(
            "Expected parameter name before end of line".to_owned(),
            Span::point(dc.offset()),
        );
    };
    if !is_ident_start(first) {
        let start = dc.offset();
        dc.bump(buffer);
        return err(
            "Expected ',' or ')' here.".to_owned(),
            Span::new(start, dc.offset()),
        );
    }

    let mut params = vec![read_identifier(buffer, dc)];

    loop {
        skip_space_and_comments(buffer, dc);
        match dc.peek(buffer) {
            None => {
                return err(
                    "Expected ')' before end of line".to_owned(),
                    Span::point(dc.offset()),
                );
            }
            Some(')') => {
                dc.bump(buffer);
                return Ok(params);
            }
            Some(',') => {
                dc.bump(buffer);
                skip_space_and_comments(buffer, dc);
                match dc.peek(buffer) {
                    None => {
                        return err(
                            "Expected parameter name before end of line".to_owned(),
                            Span::point(dc.offset()),
                        );
                    }
                    Some(ch) if !is_ident_start(ch) => {
                        let start = dc.offset();
                        dc.bump(buffer);
                        return err(
                            "Expected ',' or ')' here.".to_owned(),
                            Span::new(start, dc.offset()),
                        );
                    }
                    Some(_) => {
                        let start = dc.offset();
                        let param = read_identifier(buffer, dc);
                        let span = Span::new(start, dc.offset());
                        if params.contains(&param) {
                            return err(
                                format!(
                                    "Duplicated parameter \"{param}\" in the function-like macro \"{macro_name}\"."
                                ),
                                span,
                            );
                        }
                        params.push(param);
                    }
                }
            }
            Some(_) => {
                let start = dc.offset();
                dc.bump(buffer);
                return err(
                    "Expected ',' or ')' here.".to_owned(),
                    Span::new(start, dc.offset()),
                );
            }
        }
    }
}

/// The replacement text: rest of the line, trimmed, with interior
/// whitespace/comment runs collapsed to single spaces. The collapse is
/// quote-aware, so string and character literals in the body keep their
/// spacing. `#`/`##` are refused.
fn read_body(
    buffer: &CodeBuffer,
    dc: &mut DirectiveCursor,
    sink: &ErrorSink,
) -> Result<String, ()> {
    let mut out = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    loop {
        let Some(ch) = dc.peek(buffer) else { break };

        if let Some(q) = quote {
            if let Some((ch, _)) = dc.bump(buffer) {
                out.push(ch);
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
            }
            continue;
        }

        if is_directive_space(ch) || ch == '\x0B' || ch == '\x0C' {
            dc.bump(buffer);
            push_collapsed_space(&mut out);
            continue;
        }
        if dc.looking_at(buffer, "//") {
            while dc.bump(buffer).is_some() {}
            break;
        }
        if dc.looking_at(buffer, "/*") {
            dc.bump(buffer);
            dc.bump(buffer);
            loop {
                if dc.looking_at(buffer, "*/") {
                    dc.bump(buffer);
                    dc.bump(buffer);
                    break;
                }
                if dc.bump(buffer).is_none() {
                    break;
                }
            }
            push_collapsed_space(&mut out);
            continue;
        }
        if ch == '#' {
            let start = dc.offset();
            dc.bump(buffer);
            let op = if dc.peek(buffer) == Some('#') {
                dc.bump(buffer);
                "##"
            } else {
                "#"
            };
            sink.report(Diagnostic::error(
                format!("\"{op}\" is not supported in a macro body."),
                Span::new(start, dc.offset()),
            ));
            return Err(());
        }

        if let Some((ch, _)) = dc.bump(buffer) {
            out.push(ch);
            if ch == '"' || ch == '\'' {
                quote = Some(ch);
                escaped = false;
            }
        }
    }

    while out.ends_with(' ') {
        out.pop();
    }
    Ok(out)
}

fn push_collapsed_space(out: &mut String) {
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
}

/// Apply the redefinition policy and insert.
fn register(def: MacroDefinition, name_span: Span, macros: &mut MacroTable, sink: &ErrorSink) {
    if let Some(existing) = macros.get(&def.name) {
        if !existing.same_definition(&def) {
            sink.report(Diagnostic::warning(
                format!("Macro \"{}\" redefined.", def.name),
                name_span,
            ));
        }
    }
    debug!(name = %def.name, kind = ?def.kind, params = def.params.len(), "defined macro");
    macros.define(def);
}
