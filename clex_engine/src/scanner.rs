//! Character cursor over source text
//!
//! The scanner walks a `&str` one Unicode scalar value at a time, keeping
//! line/column in step with the byte offset. It never splits a UTF-8
//! sequence and never moves backwards.

use crate::utils::Position;

/// Spaces, tabs, vertical tab and form feed
pub fn is_horizontal_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\x0B' | '\x0C')
}

#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    pos: Position,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: Position::start(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.text
    }

    /// Unconsumed input
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos.offset..]
    }

    /// Character `n` positions ahead of the cursor; `None` past the end
    pub fn peek(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Consume one character
    pub fn advance(&mut self) -> Option<char> {
        let mut chars = self.rest().chars();
        let ch = chars.next()?;
        self.pos = self.pos.advance(ch, chars.next());
        Some(ch)
    }

    pub fn current_position(&self) -> Position {
        self.pos
    }

    pub fn offset(&self) -> usize {
        self.pos.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.pos.offset >= self.text.len()
    }

    /// Source text from `start` up to the cursor
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.text[start.min(self.pos.offset)..self.pos.offset]
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Consume `expected` if it is next
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek(0) == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `s` if the input continues with it
    pub fn eat_str(&mut self, s: &str) -> bool {
        if !self.starts_with(s) {
            return false;
        }
        for _ in s.chars() {
            self.advance();
        }
        true
    }

    /// Consume characters while `pred` holds
    pub fn eat_while<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(char) -> bool,
    {
        let mut count = 0;
        while let Some(ch) = self.peek(0) {
            if !pred(ch) {
                break;
            }
            self.advance();
            count += 1;
        }
        count
    }

    /// Consume characters until the cursor reaches byte `offset` (or the end)
    pub fn advance_to(&mut self, offset: usize) {
        while self.pos.offset < offset && self.advance().is_some() {}
    }

    /// Consume everything that is left
    pub fn advance_to_end(&mut self) {
        self.advance_to(self.text.len());
    }

    /// Consume one line terminator (`\n`, `\r\n` or `\r`)
    pub fn eat_newline(&mut self) -> bool {
        match self.peek(0) {
            Some('\r') => {
                self.advance();
                self.eat('\n');
                true
            }
            Some('\n') => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    /// True when the cursor is at a line terminator
    pub fn at_newline(&self) -> bool {
        matches!(self.peek(0), Some('\n' | '\r'))
    }

    /// True when only horizontal space precedes the cursor on its physical line
    pub fn at_line_start(&self) -> bool {
        self.text[..self.pos.offset]
            .chars()
            .rev()
            .take_while(|&c| c != '\n' && c != '\r')
            .all(is_horizontal_space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_advance() {
        let mut scanner = Scanner::new("ab");
        assert_eq!(scanner.peek(0), Some('a'));
        assert_eq!(scanner.peek(1), Some('b'));
        assert_eq!(scanner.peek(2), None);

        assert_eq!(scanner.advance(), Some('a'));
        assert_eq!(scanner.advance(), Some('b'));
        assert_eq!(scanner.advance(), None);
        assert!(scanner.is_at_end());
        assert_eq!(scanner.offset(), 2);
    }

    #[test]
    fn test_positions_follow_line_terminators() {
        let mut scanner = Scanner::new("a\r\nb\rc\nd");
        while scanner.peek(0) != Some('d') {
            scanner.advance();
        }
        assert_eq!(scanner.current_position(), Position::new(8, 4, 1));
    }

    #[test]
    fn test_multibyte_characters() {
        let mut scanner = Scanner::new("é中x");
        scanner.advance();
        scanner.advance();
        assert_eq!(scanner.current_position(), Position::new(5, 1, 3));
        assert_eq!(scanner.slice_from(0), "é中");
        assert_eq!(scanner.peek(0), Some('x'));
    }

    #[test]
    fn test_eat_helpers() {
        let mut scanner = Scanner::new("<=>x\r\ny");
        assert!(!scanner.eat_str("<<"));
        assert!(scanner.eat_str("<=>"));
        assert!(scanner.eat('x'));
        assert!(!scanner.eat('x'));
        assert!(scanner.at_newline());
        assert!(scanner.eat_newline());
        assert_eq!(scanner.current_position().line, 2);
        assert_eq!(scanner.eat_while(|c| c == 'y'), 1);
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_advance_to() {
        let mut scanner = Scanner::new("ab\ncd");
        scanner.advance_to(4);
        assert_eq!(scanner.current_position(), Position::new(4, 2, 2));
        assert_eq!(scanner.rest(), "d");
        scanner.advance_to_end();
        assert!(scanner.is_at_end());
        assert_eq!(scanner.rest(), "");
    }

    #[test]
    fn test_at_line_start() {
        let mut scanner = Scanner::new("  \t#x\ny #");
        scanner.eat_while(|c| c == ' ' || c == '\t');
        assert!(scanner.at_line_start());
        scanner.eat_while(|c| c != '\n');
        scanner.eat_newline();
        assert!(scanner.at_line_start());
        scanner.eat_while(|c| c != '#');
        assert!(!scanner.at_line_start());
    }

    #[test]
    fn test_at_line_start_after_vertical_tab_and_form_feed() {
        let mut scanner = Scanner::new("\x0B\x0C #define A 1");
        scanner.eat_while(is_horizontal_space);
        assert_eq!(scanner.peek(0), Some('#'));
        assert!(scanner.at_line_start());
    }
}
