//! The preprocessor's character pump and macro expansion engine.
//!
//! [`Preprocessor::get`] produces one output character at a time,
//! applying four transforms on the way:
//!
//! 1. comment elision and whitespace collapsing (a run of whitespace
//!    and/or comments becomes one space, never two in a row);
//! 2. directive handling (`#` at the start of a logical line);
//! 3. macro expansion with rescan, via buffer sections and the section
//!    stack;
//! 4. verbatim passthrough inside string and character literals.
//!
//! Expansion enters a section by pushing a frame that remembers where to
//! resume and which macro names are hidden there; exhausting a section
//! pops the frame. Identifiers that fail to expand are replayed
//! character-by-character from their original offsets through a small
//! pending queue, so downstream consumers see them verbatim.


use std::collections::VecDeque;

use chert_diagnostic::{Diagnostic, ErrorSink, Span};
use chert_lexer_core::classify::{
    is_ident_continue, is_ident_start, is_literal_terminator, is_whitespace,
};
use chert_lexer_core::{CharSource, CodeBuffer, Cursor, SectionId};
use smallvec::SmallVec;
use tracing::trace;

use crate::cache::{invocation_key, ExpansionCache};
use crate::directive;
use crate::hide_set::HideSet;
use crate::macro_table::MacroTable;
use crate::pp_char::PpChar;

/// One level of the section stack.
#[derive(Clone, Debug)]
struct Frame {
    /// Cursor to restore once the entered section is exhausted.
    saved: Cursor,
    /// Macro names that must not expand inside the entered section.
    hide: HideSet,
}

/// In-literal passthrough state.
#[derive(Clone, Copy, Debug)]
struct QuoteState {
    delim: char,
    escaped: bool,
}

/// Outcome of [`Preprocessor::try_expand`].
enum Expansion {
    /// Replacement text lives in this section; enter it and rescan.
    Section(SectionId),
    /// The replacement is a single space; `offset` addresses its byte.
    Space(u32),
    /// The replacement is empty text (function-like with empty body).
    Empty,
    /// No expansion here; the identifier stands as written.
    NotAMacro,
    /// Structural error, already reported; the identifier stands.
    Invalid,
}

/// Which delimiter ended an argument.
enum ArgEnd {
    Comma,
    Close,
}

/// The preprocessor: a character stream over the code buffer.
///
/// Construction fast-forwards past leading whitespace, comments, and
/// directives, so the first [`get`](Preprocessor::get) already returns a
/// real output character (or nothing at all).
pub struct Preprocessor {
    buffer: CodeBuffer,
    sink: ErrorSink,
    macros: MacroTable,
    cache: ExpansionCache,
    cursor: Cursor,
    stack: SmallVec<[Frame; 8]>,
    /// Characters scheduled for emission before the scanner is consulted
    /// again: failed-expansion identifiers replayed verbatim.
    replay: VecDeque<PpChar>,
    /// Already-produced output characters not yet handed to the caller.
    lookahead: VecDeque<PpChar>,
    last_emitted: Option<char>,
    can_parse_directives: bool,
    quote: Option<QuoteState>,
}

impl Preprocessor {
    pub fn new(buffer: CodeBuffer, sink: ErrorSink) -> Self {
        let cursor = Cursor::new(&buffer);
        let mut pp = Preprocessor {
            buffer,
            sink,
            macros: MacroTable::new(),
            cache: ExpansionCache::new(),
            cursor,
            stack: SmallVec::new(),
            replay: VecDeque::new(),
            lookahead: VecDeque::new(),
            last_emitted: None,
            can_parse_directives: true,
            quote: None,
        };
        pp.fill_lookahead(1);
        pp
    }

    /// Consume and return the next output character.
    pub fn get(&mut self) -> Option<PpChar> {
        if let Some(pc) = self.lookahead.pop_front() {
            return Some(pc);
        }
        self.pump()
    }

    /// The next output character, without consuming it.
    pub fn peek(&mut self) -> Option<PpChar> {
        self.peek_nth_char(0)
    }

    /// `true` once the whole translation unit has been consumed: section
    /// 0 exhausted, section stack empty, nothing buffered for replay.
    pub fn reached_end_of_input(&mut self) -> bool {
        self.peek().is_none()
    }

    /// The code buffer, including every expansion section added so far.
    pub fn buffer(&self) -> &CodeBuffer {
        &self.buffer
    }

    /// The macro table as populated by the directives seen so far.
    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    // ─── Output pump ────────────────────────────────────────────────────

    fn peek_nth_char(&mut self, n: usize) -> Option<PpChar> {
        self.fill_lookahead(n + 1);
        self.lookahead.get(n).copied()
    }

    fn fill_lookahead(&mut self, n: usize) {
        while self.lookahead.len() < n {
            match self.pump() {
                Some(pc) => self.lookahead.push_back(pc),
                None => break,
            }
        }
    }

    /// Produce the next output character from the scanner state.
    fn pump(&mut self) -> Option<PpChar> {
        loop {
            if let Some(pc) = self.replay.pop_front() {
                return Some(self.emit(pc));
            }

            if self.quote.is_some() {
                let (ch, offset) = self.bump_raw()?;
                self.update_quote_state(ch);
                return Some(self.emit(PpChar::new(ch, offset)));
            }

            // Whitespace, comments, and directive lines form one run.
            let mut run_start: Option<u32> = None;
            loop {
                self.pop_exhausted();
                let offset = self.cursor.offset();
                match self.cursor.peek(&self.buffer) {
                    Some(ch) if is_whitespace(ch) => {
                        self.cursor.bump(&self.buffer);
                        if ch == '\n' || ch == '\r' {
                            self.can_parse_directives = true;
                        }
                        run_start.get_or_insert(offset);
                    }
                    Some('/') if self.cursor.looking_at(&self.buffer, "//") => {
                        self.cursor.bump(&self.buffer);
                        self.cursor.bump(&self.buffer);
                        self.cursor.skip_to_raw_newline(&self.buffer);
                        run_start.get_or_insert(offset);
                    }
                    Some('/') if self.cursor.looking_at(&self.buffer, "/*") => {
                        self.skip_block_comment(offset);
                        run_start.get_or_insert(offset);
                    }
                    Some('#') if self.can_parse_directives && self.stack.is_empty() => {
                        directive::handle_directive(
                            &self.buffer,
                            &mut self.cursor,
                            &mut self.macros,
                            &self.sink,
                        );
                    }
                    _ => break,
                }
            }
            if let (Some(start), Some(last)) = (run_start, self.last_emitted) {
                if last != ' ' {
                    return Some(self.emit(PpChar::new(' ', start)));
                }
            }

            self.pop_exhausted();
            let offset = self.cursor.offset();
            let ch = self.cursor.peek(&self.buffer)?;

            if is_ident_start(ch) {
                self.identifier(offset);
                continue;
            }

            self.cursor.bump(&self.buffer);
            if ch == '"' || ch == '\'' {
                self.quote = Some(QuoteState {
                    delim: ch,
                    escaped: false,
                });
            }
            return Some(self.emit(PpChar::new(ch, offset)));
        }
    }

    /// Record what went out; directives become unparsable after the
    /// first non-whitespace character of a line and parsable again after
    /// a raw newline (which only ever reaches the output inside a broken
    /// literal).
    fn emit(&mut self, pc: PpChar) -> PpChar {
        self.last_emitted = Some(pc.ch);
        match pc.ch {
            '\n' | '\r' => self.can_parse_directives = true,
            ' ' | '\t' | '\x0B' | '\x0C' => {}
            _ => self.can_parse_directives = false,
        }
        pc
    }

    fn update_quote_state(&mut self, ch: char) {
        let Some(q) = &mut self.quote else { return };
        if q.escaped {
            q.escaped = false;
        } else if ch == '\\' {
            q.escaped = true;
        } else if ch == q.delim || is_literal_terminator(ch) {
            self.quote = None;
        }
    }

    // ─── Scanner plumbing ───────────────────────────────────────────────

    /// Pop every fully scanned section, restoring the saved cursors.
    fn pop_exhausted(&mut self) {
        while self.cursor.at_end() {
            match self.stack.pop() {
                Some(frame) => {
                    trace!(depth = self.stack.len(), "exiting expansion section");
                    self.cursor = frame.saved;
                }
                None => break,
            }
        }
    }

    fn bump_raw(&mut self) -> Option<(char, u32)> {
        self.pop_exhausted();
        self.cursor.bump(&self.buffer)
    }

    fn raw_offset(&mut self) -> u32 {
        self.pop_exhausted();
        self.cursor.offset()
    }

    /// Consume a `/* … */` comment; `start` is the offset of the `/*`.
    fn skip_block_comment(&mut self, start: u32) {
        self.cursor.bump(&self.buffer);
        self.cursor.bump(&self.buffer);
        loop {
            self.pop_exhausted();
            if self.cursor.looking_at(&self.buffer, "*/") {
                self.cursor.bump(&self.buffer);
                self.cursor.bump(&self.buffer);
                return;
            }
            if self.cursor.bump(&self.buffer).is_none() {
                self.sink.report(Diagnostic::error(
                    "Unterminated comment.",
                    Span::new(start, start + 2),
                ));
                return;
            }
        }
    }

    /// Hide set in effect at the current read position.
    fn current_hide(&self) -> HideSet {
        self.stack
            .last()
            .map(|frame| frame.hide.clone())
            .unwrap_or_default()
    }

    fn enter_section(&mut self, id: SectionId, name: &str) {
        let hide = self.current_hide().extend(name);
        trace!(name = %name, section = ?id, depth = self.stack.len() + 1, "entering expansion");
        self.stack.push(Frame {
            saved: self.cursor,
            hide,
        });
        self.cursor = Cursor::over_section(&self.buffer, id);
    }

    // ─── Identifiers and expansion ──────────────────────────────────────

    /// Read the identifier at the cursor and either expand it or queue
    /// its characters for verbatim replay.
    fn identifier(&mut self, start: u32) {
        let mut name = String::new();
        let mut chars: SmallVec<[PpChar; 16]> = SmallVec::new();
        loop {
            self.pop_exhausted();
            match self.cursor.peek(&self.buffer) {
                Some(ch) if is_ident_continue(ch) => {
                    let offset = self.cursor.offset();
                    self.cursor.bump(&self.buffer);
                    name.push(ch);
                    chars.push(PpChar::new(ch, offset));
                }
                _ => break,
            }
        }

        if self.current_hide().contains(&name) {
            trace!(name = %name, "hidden inside its own expansion; replaying");
            self.replay.extend(chars);
            return;
        }

        match self.try_expand(&name, start) {
            Expansion::Section(id) => self.enter_section(id, &name),
            Expansion::Space(offset) => {
                if self.last_emitted != Some(' ') {
                    self.replay.push_back(PpChar::new(' ', offset));
                }
            }
            Expansion::Empty => {}
            Expansion::NotAMacro | Expansion::Invalid => self.replay.extend(chars),
        }
    }

    /// Attempt to expand `name`, whose spelling started at `name_start`.
    ///
    /// For a function-like macro this may consume the argument list —
    /// including across section boundaries, which is what lets a macro
    /// name at the end of one expansion collect its arguments from the
    /// enclosing text (rescan).
    fn try_expand(&mut self, name: &str, name_start: u32) -> Expansion {
        let Some(def) = self.macros.get(name) else {
            return Expansion::NotAMacro;
        };
        let def = def.clone();

        let mut args = if def.is_function_like() {
            if !self.consume_invocation_paren() {
                trace!(name = %name, "function-like name without argument list");
                return Expansion::NotAMacro;
            }
            match self.parse_arguments(name) {
                Ok(args) => Some(args),
                Err(()) => return Expansion::Invalid,
            }
        } else {
            None
        };

        if let Some(args) = &mut args {
            // `ID()` invokes a one-parameter macro with one empty argument.
            if def.params.len() == 1 && args.is_empty() {
                args.push(String::new());
            }
            if args.len() != def.params.len() {
                // The invocation may have crossed a section boundary, in
                // which case the offsets are not ordered.
                let end = self.raw_offset();
                self.sink.report(Diagnostic::error(
                    format!(
                        "The macro \"{}\" requires {} argument(s), but got {}.",
                        def.name,
                        def.params.len(),
                        args.len()
                    ),
                    Span::new(name_start.min(end), name_start.max(end)),
                ));
                return Expansion::Invalid;
            }
        }

        let key = match &args {
            Some(args) => invocation_key(name, args),
            None => name.to_owned(),
        };
        if let Some(id) = self.cache.get(&key) {
            trace!(key = %key, section = ?id, "expansion cache hit");
            return self.section_expansion(id);
        }

        let text = match &args {
            None if def.body.is_empty() => " ".to_owned(),
            None => def.body.clone(),
            Some(args) => substitute_params(&def, args),
        };
        if text.is_empty() {
            trace!(name = %name, "expansion produced no text");
            return Expansion::Empty;
        }

        let id = self.buffer.add_section(text.as_bytes());
        self.cache.insert(key, id);
        trace!(name = %name, section = ?id, bytes = text.len(), "expansion cached");
        self.section_expansion(id)
    }

    fn section_expansion(&self, id: SectionId) -> Expansion {
        if self.buffer.section_bytes(id) == b" " {
            Expansion::Space(self.buffer.section_start(id))
        } else {
            Expansion::Section(id)
        }
    }

    /// Probe for the `(` that makes a function-like name an invocation,
    /// skipping whitespace and comments, possibly across section
    /// boundaries. Commits (consuming through the `(`) on success;
    /// restores the scanner on failure.
    fn consume_invocation_paren(&mut self) -> bool {
        let saved_cursor = self.cursor;
        let saved_stack = self.stack.clone();
        loop {
            self.pop_exhausted();
            match self.cursor.peek(&self.buffer) {
                Some('(') => {
                    self.cursor.bump(&self.buffer);
                    return true;
                }
                Some(ch) if is_whitespace(ch) => {
                    self.cursor.bump(&self.buffer);
                }
                Some('/') if self.cursor.looking_at(&self.buffer, "//") => {
                    self.cursor.bump(&self.buffer);
                    self.cursor.bump(&self.buffer);
                    self.cursor.skip_to_raw_newline(&self.buffer);
                }
                Some('/') if self.cursor.looking_at(&self.buffer, "/*") => {
                    self.cursor.bump(&self.buffer);
                    self.cursor.bump(&self.buffer);
                    loop {
                        self.pop_exhausted();
                        if self.cursor.looking_at(&self.buffer, "*/") {
                            self.cursor.bump(&self.buffer);
                            self.cursor.bump(&self.buffer);
                            break;
                        }
                        if self.cursor.bump(&self.buffer).is_none() {
                            // Unterminated; the main loop will report it.
                            self.cursor = saved_cursor;
                            self.stack = saved_stack;
                            return false;
                        }
                    }
                }
                _ => {
                    self.cursor = saved_cursor;
                    self.stack = saved_stack;
                    return false;
                }
            }
        }
    }

    /// Parse the argument list after the consumed `(`.
    fn parse_arguments(&mut self, name: &str) -> Result<Vec<String>, ()> {
        let mut base_depth = self.stack.len();
        let mut args = Vec::new();

        // `F()` is the empty list only when `)` directly follows `(`.
        self.pop_exhausted();
        if self.cursor.peek(&self.buffer) == Some(')') {
            self.cursor.bump(&self.buffer);
            return Ok(args);
        }

        loop {
            let (arg, end) = self.parse_one_argument(name, &mut base_depth)?;
            args.push(arg);
            match end {
                ArgEnd::Comma => {}
                ArgEnd::Close => return Ok(args),
            }
        }
    }

    /// Parse one argument; stops at (and consumes) the `,` or `)` that
    /// ends it.
    ///
    /// The delimiter search is restricted to the *base section*: a `,`
    /// or `)` that exists only because an inner expansion produced one
    /// is ordinary argument text. When the expansion that argument
    /// parsing started in finishes, the base drops with it.
    fn parse_one_argument(
        &mut self,
        name: &str,
        base_depth: &mut usize,
    ) -> Result<(String, ArgEnd), ()> {
        let mut out = String::new();
        let mut depth: u32 = 0;

        loop {
            self.pop_exhausted();
            if self.stack.len() < *base_depth {
                *base_depth = self.stack.len();
            }
            let at_base = self.stack.len() == *base_depth;

            let offset = self.cursor.offset();
            let Some(ch) = self.cursor.peek(&self.buffer) else {
                self.sink.report(Diagnostic::error(
                    format!("unterminated argument list invoking macro \"{name}\""),
                    Span::point(offset),
                ));
                return Err(());
            };

            match ch {
                ',' if depth == 0 && at_base => {
                    self.cursor.bump(&self.buffer);
                    return Ok((finish_argument(out), ArgEnd::Comma));
                }
                ')' if depth == 0 && at_base => {
                    self.cursor.bump(&self.buffer);
                    return Ok((finish_argument(out), ArgEnd::Close));
                }
                '(' => {
                    depth += 1;
                    self.cursor.bump(&self.buffer);
                    out.push('(');
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    self.cursor.bump(&self.buffer);
                    out.push(')');
                }
                ch if is_whitespace(ch) => {
                    self.cursor.bump(&self.buffer);
                    push_collapsed_space(&mut out);
                }
                '/' if self.cursor.looking_at(&self.buffer, "//") => {
                    self.cursor.bump(&self.buffer);
                    self.cursor.bump(&self.buffer);
                    self.cursor.skip_to_raw_newline(&self.buffer);
                    push_collapsed_space(&mut out);
                }
                '/' if self.cursor.looking_at(&self.buffer, "/*") => {
                    self.skip_block_comment(offset);
                    push_collapsed_space(&mut out);
                }
                ch if is_ident_start(ch) => {
                    let start = self.cursor.offset();
                    let ident = self.read_plain_identifier();
                    if self.current_hide().contains(&ident) {
                        out.push_str(&ident);
                        continue;
                    }
                    match self.try_expand(&ident, start) {
                        Expansion::Section(id) => self.enter_section(id, &ident),
                        Expansion::Space(_) => push_collapsed_space(&mut out),
                        Expansion::Empty => {}
                        Expansion::NotAMacro | Expansion::Invalid => out.push_str(&ident),
                    }
                }
                _ => {
                    self.cursor.bump(&self.buffer);
                    out.push(ch);
                }
            }
        }
    }

    fn read_plain_identifier(&mut self) -> String {
        let mut name = String::new();
        loop {
            self.pop_exhausted();
            match self.cursor.peek(&self.buffer) {
                Some(ch) if is_ident_continue(ch) => {
                    self.cursor.bump(&self.buffer);
                    name.push(ch);
                }
                _ => break,
            }
        }
        name
    }
}

/// Walk a replacement list, substituting parameter occurrences with the
/// corresponding argument texts. Everything else is copied through;
/// nested macro names are recognized later, on rescan.
fn substitute_params(def: &crate::macro_table::MacroDefinition, args: &[String]) -> String {
    let mut cursor = chert_lexer_core::SliceCursor::new(def.body.as_bytes());
    let mut out = String::with_capacity(def.body.len());

    while let Some(ch) = cursor.peek() {
        if is_ident_start(ch) {
            let mut ident = String::new();
            while let Some(c) = cursor.peek() {
                if !is_ident_continue(c) {
                    break;
                }
                cursor.bump();
                ident.push(c);
            }
            match def.param_index(&ident) {
                Some(i) => out.push_str(&args[i]),
                None => out.push_str(&ident),
            }
        } else {
            cursor.bump();
            out.push(ch);
        }
    }
    out
}

fn push_collapsed_space(out: &mut String) {
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
}

fn finish_argument(mut out: String) -> String {
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

impl CharSource for Preprocessor {
    fn get(&mut self) -> Option<char> {
        Preprocessor::get(self).map(|pc| pc.ch)
    }

    fn peek_nth(&mut self, n: usize) -> Option<char> {
        self.peek_nth_char(n).map(|pc| pc.ch)
    }

    fn offset(&mut self) -> u32 {
        match self.peek_nth_char(0) {
            Some(pc) => pc.offset,
            None => self.buffer.len(),
        }
    }
}
