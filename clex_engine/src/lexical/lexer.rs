//! Pull-based C/C++ lexer
//!
//! Each call to [`Lexer::next_token`] consumes exactly one token's worth of
//! input and returns it with the raw kind. Keywords are not recognised here;
//! identifiers are refined later by the classifier. Malformed input produces
//! `Invalid` tokens and diagnostics, never an error. The only error is asking
//! for more tokens after `EndOfInput` has been returned.

use crate::config::compile_time::lexical::{
    MAX_RAW_STRING_DELIMITER_LENGTH, MAX_TOKEN_PREVIEW_LENGTH,
};
use crate::config::runtime::LexicalPreferences;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::lexical::metrics::LexicalMetrics;
use crate::logging::codes;
use crate::rules::RuleTable;
use crate::scanner::{is_horizontal_space, Scanner};
use crate::tokens::{CommentKind, Token, TokenKind};
use crate::utils::Position;
use crate::{log_debug, log_error};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Lexer exhausted: EndOfInput was already returned")]
    Exhausted,
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::Exhausted => codes::lexical::LEXER_EXHAUSTED,
        }
    }
}

/// Encoding prefixes, longest first so `u8` wins over `u`
const ENCODING_PREFIXES: [&str; 4] = ["u8", "L", "u", "U"];
const RAW_PREFIXES: [&str; 5] = ["u8R", "LR", "uR", "UR", "R"];

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_identifier_continue(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_raw_delimiter_char(ch: char) -> bool {
    !matches!(ch, ' ' | '(' | ')' | '\\') && !ch.is_control()
}

pub struct Lexer<'a> {
    scanner: Scanner<'a>,
    rules: &'a RuleTable,
    preferences: LexicalPreferences,
    diagnostics: DiagnosticSink,
    metrics: LexicalMetrics,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, rules: &'a RuleTable) -> Self {
        Self::with_preferences(text, rules, LexicalPreferences::default())
    }

    pub fn with_preferences(
        text: &'a str,
        rules: &'a RuleTable,
        preferences: LexicalPreferences,
    ) -> Self {
        let diagnostics =
            DiagnosticSink::new(preferences.log_diagnostics, preferences.include_position_in_errors);
        Self {
            scanner: Scanner::new(text),
            rules,
            preferences,
            diagnostics,
            metrics: LexicalMetrics::default(),
            finished: false,
        }
    }

    pub fn rules(&self) -> &'a RuleTable {
        self.rules
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    pub fn dropped_diagnostics(&self) -> usize {
        self.diagnostics.dropped()
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume the lexer, keeping what it collected
    pub fn finish(self) -> (DiagnosticSink, LexicalMetrics) {
        (self.diagnostics, self.metrics)
    }

    pub fn next_token(&mut self) -> Result<Token<'a>, LexerError> {
        if self.finished {
            log_error!(
                codes::lexical::LEXER_EXHAUSTED,
                "next_token called after EndOfInput",
                "offset" => self.scanner.offset()
            );
            return Err(LexerError::Exhausted);
        }

        let start = self.scanner.current_position();
        let Some(ch) = self.scanner.peek(0) else {
            self.finished = true;
            log_debug!("Lexing finished",
                "tokens" => self.metrics.total_tokens,
                "diagnostics" => self.diagnostics.len(),
                "dropped_diagnostics" => self.diagnostics.dropped()
            );
            return Ok(Token::end_of_input(start));
        };

        let kind = self.scan_token(ch, start);
        let token = Token::new(
            kind,
            start,
            self.scanner.current_position(),
            self.scanner.slice_from(start.offset),
        );
        self.metrics.record_token(&token, &self.preferences);
        Ok(token)
    }

    fn scan_token(&mut self, ch: char, start: Position) -> TokenKind {
        if is_horizontal_space(ch) {
            self.scanner.eat_while(is_horizontal_space);
            return TokenKind::Whitespace;
        }
        if self.scanner.eat_newline() {
            return TokenKind::Newline;
        }
        if self.scanner.starts_with("//") {
            self.scan_line_comment();
            return TokenKind::Comment(CommentKind::Line);
        }
        if self.scanner.starts_with("/*") {
            self.scan_block_comment(start);
            return TokenKind::Comment(CommentKind::Block);
        }
        if ch == '#' && self.scanner.at_line_start() {
            self.scan_directive();
            return TokenKind::Preprocessor;
        }
        if let Some(kind) = self.try_scan_literal(start) {
            return kind;
        }
        if ch.is_ascii_digit()
            || (ch == '.' && self.scanner.peek(1).is_some_and(|c| c.is_ascii_digit()))
        {
            self.scan_number();
            return TokenKind::Number;
        }
        if is_identifier_start(ch) {
            self.scanner.eat_while(is_identifier_continue);
            return TokenKind::Identifier;
        }
        if let Some(op) = self.rules.match_operator(self.scanner.rest()) {
            self.scanner.eat_str(op);
            return TokenKind::Operator;
        }
        if self.rules.is_punctuation_char(ch) {
            self.scanner.advance();
            return TokenKind::Punctuation;
        }

        self.scanner.advance();
        self.diagnostics.report(
            start,
            DiagnosticKind::InvalidCharacter,
            &format!("Unexpected character {:?}", ch),
        );
        TokenKind::Invalid
    }

    /// Backslash directly before a line terminator
    fn at_line_continuation(&self) -> bool {
        self.scanner.peek(0) == Some('\\') && matches!(self.scanner.peek(1), Some('\n' | '\r'))
    }

    fn eat_line_continuation(&mut self) -> bool {
        if self.at_line_continuation() {
            self.scanner.advance();
            self.scanner.eat_newline();
            true
        } else {
            false
        }
    }

    fn scan_line_comment(&mut self) {
        self.scanner.eat_str("//");
        loop {
            if self.eat_line_continuation() {
                continue;
            }
            if self.scanner.is_at_end() || self.scanner.at_newline() {
                break;
            }
            self.scanner.advance();
        }
    }

    /// Returns false when the comment runs to end of input
    fn skip_block_comment_body(&mut self) -> bool {
        match self.scanner.rest().find("*/") {
            Some(idx) => {
                let target = self.scanner.offset() + idx + 2;
                self.scanner.advance_to(target);
                true
            }
            None => {
                self.scanner.advance_to_end();
                false
            }
        }
    }

    fn scan_block_comment(&mut self, start: Position) {
        self.scanner.eat_str("/*");
        if !self.skip_block_comment_body() {
            self.diagnostics.report(
                start,
                DiagnosticKind::UnterminatedComment,
                "Unterminated block comment",
            );
        }
    }

    fn scan_directive(&mut self) {
        self.scanner.eat('#');
        loop {
            if self.eat_line_continuation() {
                continue;
            }
            match self.scanner.peek(0) {
                None | Some('\n' | '\r') => break,
                Some(quote @ ('"' | '\'')) => {
                    self.scanner.advance();
                    self.skip_quoted_body(quote);
                }
                Some('/') if self.scanner.peek(1) == Some('/') => {
                    self.scan_line_comment();
                    break;
                }
                Some('/') if self.scanner.peek(1) == Some('*') => {
                    let comment_start = self.scanner.current_position();
                    self.scanner.eat_str("/*");
                    if !self.skip_block_comment_body() {
                        self.diagnostics.report(
                            comment_start,
                            DiagnosticKind::UnterminatedComment,
                            "Unterminated block comment",
                        );
                    }
                }
                Some(_) => {
                    self.scanner.advance();
                }
            }
        }
    }

    /// Consume a quoted body after its opening `quote`. Escapes are taken as
    /// pairs and backslash-newline continues the literal. Stops before a line
    /// terminator; returns whether the closing quote was found.
    fn skip_quoted_body(&mut self, quote: char) -> bool {
        loop {
            if self.eat_line_continuation() {
                continue;
            }
            match self.scanner.peek(0) {
                None | Some('\n' | '\r') => return false,
                Some('\\') => {
                    self.scanner.advance();
                    if self.scanner.peek(0).is_some() && !self.scanner.at_newline() {
                        self.scanner.advance();
                    }
                }
                Some(c) if c == quote => {
                    self.scanner.advance();
                    return true;
                }
                Some(_) => {
                    self.scanner.advance();
                }
            }
        }
    }

    fn try_scan_literal(&mut self, start: Position) -> Option<TokenKind> {
        let rest = self.scanner.rest();

        if self.rules.allows_raw_strings() {
            for prefix in RAW_PREFIXES {
                if let Some(after) = rest.strip_prefix(prefix) {
                    if let Some(delimiter) = raw_string_delimiter(after) {
                        return Some(self.scan_raw_string(prefix, delimiter, start));
                    }
                }
            }
        }

        let prefix = ENCODING_PREFIXES
            .iter()
            .copied()
            .find(|p| rest.starts_with(p) && matches!(rest[p.len()..].chars().next(), Some('"' | '\'')))
            .unwrap_or("");

        let quote = rest[prefix.len()..].chars().next()?;
        if quote != '"' && quote != '\'' {
            return None;
        }

        self.scanner.eat_str(prefix);
        self.scanner.advance();

        if self.skip_quoted_body(quote) {
            Some(if quote == '"' {
                TokenKind::String
            } else {
                TokenKind::Char
            })
        } else {
            let what = if quote == '"' {
                "Unterminated string literal"
            } else {
                "Unterminated character literal"
            };
            log_debug!("Unterminated literal",
                "text" => self.preview_from(start.offset)
            );
            self.diagnostics
                .report(start, DiagnosticKind::UnterminatedString, what);
            Some(TokenKind::Invalid)
        }
    }

    fn scan_raw_string(&mut self, prefix: &str, delimiter: &str, start: Position) -> TokenKind {
        // prefix, quote, delimiter, open paren
        let opener_len = prefix.len() + 1 + delimiter.len() + 1;
        let body_start = self.scanner.offset() + opener_len;
        let closing = format!("){}\"", delimiter);

        match self.scanner.source()[body_start..].find(&closing) {
            Some(idx) => self.scanner.advance_to(body_start + idx + closing.len()),
            None => {
                self.scanner.advance_to_end();
                self.diagnostics.report(
                    start,
                    DiagnosticKind::UnterminatedString,
                    "Unterminated raw string literal",
                );
            }
        }
        TokenKind::String
    }

    fn scan_number(&mut self) {
        let separators = self.rules.allows_digit_separators();
        let first = self.scanner.peek(0);
        let second = self.scanner.peek(1);
        let third = self.scanner.peek(2);

        if first == Some('0')
            && matches!(second, Some('x' | 'X'))
            && third.is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.scanner.advance();
            self.scanner.advance();
            self.eat_digits(|c| c.is_ascii_hexdigit(), separators);
            if self.scanner.eat('.') {
                self.eat_digits(|c| c.is_ascii_hexdigit(), separators);
            }
            self.eat_exponent(['p', 'P'], separators);
        } else if first == Some('0')
            && matches!(second, Some('b' | 'B'))
            && matches!(third, Some('0' | '1'))
        {
            self.scanner.advance();
            self.scanner.advance();
            self.eat_digits(|c| c == '0' || c == '1', separators);
        } else {
            self.eat_digits(|c| c.is_ascii_digit(), separators);
            if self.scanner.eat('.') {
                self.eat_digits(|c| c.is_ascii_digit(), separators);
            }
            self.eat_exponent(['e', 'E'], separators);
        }

        self.scanner
            .eat_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L' | 'f' | 'F' | 'z' | 'Z'));
    }

    /// Digits matching `is_digit`, with `'` allowed between two digits when
    /// `separators` is set
    fn eat_digits<F>(&mut self, is_digit: F, separators: bool)
    where
        F: Fn(char) -> bool,
    {
        let mut seen_digit = false;
        loop {
            match self.scanner.peek(0) {
                Some(c) if is_digit(c) => {
                    self.scanner.advance();
                    seen_digit = true;
                }
                Some('\'')
                    if separators
                        && seen_digit
                        && self.scanner.peek(1).is_some_and(&is_digit) =>
                {
                    self.scanner.advance();
                }
                _ => break,
            }
        }
    }

    /// Exponent only when at least one digit follows the marker and sign
    fn eat_exponent(&mut self, markers: [char; 2], separators: bool) {
        let Some(marker) = self.scanner.peek(0) else {
            return;
        };
        if !markers.contains(&marker) {
            return;
        }
        let digit_at = match self.scanner.peek(1) {
            Some('+' | '-') => 2,
            _ => 1,
        };
        if !self
            .scanner
            .peek(digit_at)
            .is_some_and(|c| c.is_ascii_digit())
        {
            return;
        }
        for _ in 0..digit_at {
            self.scanner.advance();
        }
        self.eat_digits(|c| c.is_ascii_digit(), separators);
    }

    fn preview_from(&self, offset: usize) -> String {
        let text = self.scanner.slice_from(offset);
        if text.chars().count() <= MAX_TOKEN_PREVIEW_LENGTH {
            text.to_string()
        } else {
            let head: String = text.chars().take(MAX_TOKEN_PREVIEW_LENGTH).collect();
            format!("{}...", head)
        }
    }
}

/// Delimiter of a raw string opener, given the text after the `R` prefix.
/// `None` when the opener is malformed.
fn raw_string_delimiter(after_prefix: &str) -> Option<&str> {
    let body = after_prefix.strip_prefix('"')?;
    let paren = body.find('(')?;
    let delimiter = &body[..paren];
    if delimiter.chars().count() > MAX_RAW_STRING_DELIMITER_LENGTH
        || !delimiter.chars().all(is_raw_delimiter_char)
    {
        return None;
    }
    Some(delimiter)
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.next_token().ok()
    }
}
