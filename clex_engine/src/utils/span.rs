//! Source location tracking
//!
//! Positions, spans over source text and a line index for turning byte
//! offsets back into line/column pairs when reporting diagnostics.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
///
/// Columns count Unicode scalar values; a tab is one column. `\n`, `\r\n`
/// and a lone `\r` each end a line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Offset 0, line 1, column 1
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Advance past `ch`. `next` is the character after it, needed so the
    /// `\r` of a `\r\n` pair does not count as a line break of its own.
    pub fn advance(self, ch: char, next: Option<char>) -> Self {
        let offset = self.offset + ch.len_utf8();
        match ch {
            '\r' if next == Some('\n') => Self {
                offset,
                line: self.line,
                column: self.column,
            },
            '\n' | '\r' => Self {
                offset,
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                offset,
                line: self.line,
                column: self.column + 1,
            },
        }
    }

    /// Advance past every character of `s`
    pub fn advance_str(self, s: &str) -> Self {
        let mut chars = s.chars().peekable();
        let mut pos = self;
        while let Some(ch) = chars.next() {
            pos = pos.advance(ch, chars.peek().copied());
        }
        pos
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range of source text used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl SourceSpan {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Empty span at `pos`
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Smallest span covering both
    pub fn merge(self, other: Self) -> Self {
        let start = if self.start.offset <= other.start.offset {
            self.start
        } else {
            other.start
        };

        let end = if self.end.offset >= other.end.offset {
            self.end
        } else {
            other.end
        };

        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.offset >= self.start.offset && pos.offset < self.end.offset
    }

    /// Source text covered by this span, or `None` if out of bounds
    pub fn slice<'a>(&self, input: &'a str) -> Option<&'a str> {
        input.get(self.start.offset..self.end.offset)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Line index over a source text
#[derive(Debug, Clone)]
pub struct SourceMap<'a> {
    source: &'a str,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl<'a> SourceMap<'a> {
    pub fn new(source: &'a str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    line_starts.push(i + 2);
                    i += 2;
                    continue;
                }
                b'\n' | b'\r' => line_starts.push(i + 1),
                _ => {}
            }
            i += 1;
        }
        Self {
            source,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line and column for a byte offset; offsets past the end clamp to it
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };

        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset].chars().count();

        Position::new(offset, (line + 1) as u32, (column + 1) as u32)
    }

    /// Text of a line (1-based) without its terminator
    pub fn get_line(&self, line_num: u32) -> Option<&'a str> {
        let line_idx = (line_num as usize).checked_sub(1)?;
        let start = *self.line_starts.get(line_idx)?;
        let end = self
            .line_starts
            .get(line_idx + 1)
            .copied()
            .unwrap_or(self.source.len());

        Some(self.source[start..end].trim_end_matches(['\n', '\r']))
    }

    /// Render a message with the offending line and a caret underline
    pub fn format_error(&self, span: &SourceSpan, message: &str) -> String {
        let mut result = String::new();

        result.push_str(&format!("error: {}\n", message));
        result.push_str(&format!(
            "  --> {}:{}\n",
            span.start.line, span.start.column
        ));

        if let Some(line) = self.get_line(span.start.line) {
            let line_num_str = span.start.line.to_string();
            let padding = " ".repeat(line_num_str.len());

            result.push_str(&format!("{} |\n", padding));
            result.push_str(&format!("{} | {}\n", line_num_str, line));

            let line_width = line.chars().count();
            let caret_start = (span.start.column as usize).saturating_sub(1).min(line_width);
            let caret_len = if span.start.line == span.end.line {
                (span.end.column.saturating_sub(span.start.column)) as usize
            } else {
                line_width - caret_start
            };

            result.push_str(&format!(
                "{} | {}{}\n",
                padding,
                " ".repeat(caret_start),
                "^".repeat(caret_len.max(1))
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_counts_line_terminators_once() {
        assert_eq!(Position::start().advance_str("ab\ncd"), Position::new(5, 2, 3));
        assert_eq!(Position::start().advance_str("a\r\nb"), Position::new(4, 2, 2));
        assert_eq!(Position::start().advance_str("a\rb"), Position::new(3, 2, 2));
        assert_eq!(Position::start().advance_str("\t\tx"), Position::new(3, 1, 4));
    }

    #[test]
    fn test_advance_counts_scalar_values() {
        let pos = Position::start().advance_str("é中");
        assert_eq!(pos.offset, 5);
        assert_eq!(pos.column, 3);
    }

    #[test]
    fn test_span_merge_and_slice() {
        let a = SourceSpan::new(Position::new(0, 1, 1), Position::new(3, 1, 4));
        let b = SourceSpan::new(Position::new(5, 1, 6), Position::new(8, 1, 9));
        let merged = a.merge(b);

        assert_eq!(merged.len(), 8);
        assert_eq!(merged.slice("int x = 1;"), Some("int x = "));
        assert!(merged.contains(Position::new(4, 1, 5)));
        assert!(!merged.contains(Position::new(8, 1, 9)));
        assert_eq!(SourceSpan::point(Position::start()).slice(""), Some(""));
    }

    #[test]
    fn test_source_map_mixed_terminators() {
        let source = "one\r\ntwo\rthree\nfour";
        let map = SourceMap::new(source);

        assert_eq!(map.line_count(), 4);
        assert_eq!(map.get_line(1), Some("one"));
        assert_eq!(map.get_line(2), Some("two"));
        assert_eq!(map.get_line(3), Some("three"));
        assert_eq!(map.get_line(4), Some("four"));
        assert_eq!(map.get_line(5), None);
        assert_eq!(map.get_line(0), None);

        assert_eq!(map.position_at(5), Position::new(5, 2, 1));
        assert_eq!(map.position_at(source.len() + 10).line, 4);
    }

    #[test]
    fn test_source_map_agrees_with_advance() {
        let source = "#define X \\\r\n  1\r/* é */\n";
        let map = SourceMap::new(source);
        for (offset, _) in source.char_indices() {
            let expected = Position::start().advance_str(&source[..offset]);
            assert_eq!(map.position_at(offset), expected, "offset {}", offset);
        }
    }

    #[test]
    fn test_format_error_underlines_span() {
        let source = "int x = @;\n";
        let map = SourceMap::new(source);
        let span = SourceSpan::new(Position::new(8, 1, 9), Position::new(9, 1, 10));

        let rendered = map.format_error(&span, "invalid character");
        assert!(rendered.contains("--> 1:9"));
        assert!(rendered.contains("1 | int x = @;"));
        assert!(rendered.contains("  |         ^\n"));
    }
}
