//! Per-line highlight tokens for renderers that draw line by line

use crate::highlight::engine::{HighlightResult, Span};
use crate::highlight::scopes::{highlight_id_for_name, HighlightId};
use crate::rules::Language;
use crate::utils::SourceMap;
use serde::Serialize;

/// One styled run within a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightToken {
    /// 0-based character column, inclusive
    pub start_col: usize,
    /// 0-based character column, exclusive
    pub end_col: usize,
    pub highlight: HighlightId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineHighlights {
    /// Sorted by `start_col`, non-overlapping
    pub tokens: Vec<HighlightToken>,
}

impl LineHighlights {
    pub fn highlight_at(&self, col: usize) -> Option<HighlightId> {
        self.tokens
            .iter()
            .take_while(|token| token.start_col <= col)
            .find(|token| col < token.end_col)
            .map(|token| token.highlight)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Split `spans` over `text` into per-line tokens.
///
/// Returns one entry per line of `text`. Spans without a scope (trivia) are
/// skipped; spans crossing line terminators are cut at each terminator.
pub fn line_highlights(text: &str, spans: &[Span]) -> Vec<LineHighlights> {
    let mut lines = vec![LineHighlights::default(); SourceMap::new(text).line_count()];

    for span in spans {
        let Some(highlight) = span.scope_name().and_then(highlight_id_for_name) else {
            continue;
        };
        let Some(span_text) = span.text(text) else {
            continue;
        };

        let mut line = span.start.line.saturating_sub(1) as usize;
        let mut col = span.start.column.saturating_sub(1) as usize;
        let mut segment_start = col;
        let mut chars = span_text.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' | '\r' => {
                    push_segment(&mut lines, line, segment_start, col, highlight);
                    line += 1;
                    col = 0;
                    segment_start = 0;
                }
                _ => col += 1,
            }
        }
        push_segment(&mut lines, line, segment_start, col, highlight);
    }

    lines
}

fn push_segment(
    lines: &mut Vec<LineHighlights>,
    line: usize,
    start_col: usize,
    end_col: usize,
    highlight: HighlightId,
) {
    if end_col <= start_col {
        return;
    }
    if line >= lines.len() {
        lines.resize(line + 1, LineHighlights::default());
    }
    lines[line].tokens.push(HighlightToken {
        start_col,
        end_col,
        highlight,
    });
}

/// Line highlights for a whole file
#[derive(Debug, Clone, Serialize)]
pub struct DocumentHighlights {
    pub language: Language,
    pub lines: Vec<LineHighlights>,
}

impl DocumentHighlights {
    pub fn new(language: Language, text: &str, spans: &[Span]) -> Self {
        Self {
            language,
            lines: line_highlights(text, spans),
        }
    }

    pub fn from_result(text: &str, result: &HighlightResult) -> Self {
        Self::new(result.language, text, &result.spans)
    }

    /// Highlights for 0-based line `n`
    pub fn line(&self, n: usize) -> Option<&LineHighlights> {
        self.lines.get(n)
    }

    pub fn line_tokens(&self, n: usize) -> &[HighlightToken] {
        self.lines
            .get(n)
            .map(|line| line.tokens.as_slice())
            .unwrap_or(&[])
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::engine::highlight;
    use crate::rules::RuleSet;

    fn id(name: &str) -> HighlightId {
        highlight_id_for_name(name).unwrap()
    }

    #[test]
    fn test_single_line() {
        let text = "int x = 42;";
        let rules = RuleSet::new();
        let result = highlight(text, Language::C, &rules);
        let lines = line_highlights(text, &result.spans);

        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].tokens,
            vec![
                HighlightToken { start_col: 0, end_col: 3, highlight: id("type.builtin") },
                HighlightToken { start_col: 4, end_col: 5, highlight: id("variable") },
                HighlightToken { start_col: 6, end_col: 7, highlight: id("operator") },
                HighlightToken { start_col: 8, end_col: 10, highlight: id("number") },
                HighlightToken { start_col: 10, end_col: 11, highlight: id("punctuation") },
            ]
        );
        assert_eq!(lines[0].highlight_at(1), Some(id("type.builtin")));
        assert_eq!(lines[0].highlight_at(3), None);
        assert_eq!(lines[0].highlight_at(99), None);
    }

    #[test]
    fn test_multiline_span_is_split() {
        let text = "/* a\r\n  b */ x";
        let rules = RuleSet::new();
        let result = highlight(text, Language::C, &rules);
        let doc = DocumentHighlights::from_result(text, &result);

        assert_eq!(doc.line_count(), 2);
        assert_eq!(
            doc.line_tokens(0),
            &[HighlightToken { start_col: 0, end_col: 4, highlight: id("comment") }]
        );
        assert_eq!(
            doc.line_tokens(1),
            &[
                HighlightToken { start_col: 0, end_col: 6, highlight: id("comment") },
                HighlightToken { start_col: 7, end_col: 8, highlight: id("variable") },
            ]
        );
        assert!(doc.line(5).is_none());
        assert!(doc.line_tokens(5).is_empty());
    }

    #[test]
    fn test_columns_count_characters() {
        let text = "\"é\" x";
        let rules = RuleSet::new();
        let result = highlight(text, Language::C, &rules);
        let lines = line_highlights(text, &result.spans);
        assert_eq!(lines[0].tokens[0].end_col, 3);
        assert_eq!(lines[0].highlight_at(4), Some(id("variable")));
    }

    #[test]
    fn test_line_highlights_agree_with_spans() {
        let text = "#include <stdio.h>\nint main(void) {\n\treturn 0; // ok\n}\n";
        let rules = RuleSet::new();
        let result = highlight(text, Language::C, &rules);
        let lines = line_highlights(text, &result.spans);

        for span in &result.spans {
            let Some(scope) = span.scope_name() else {
                continue;
            };
            if span.start.line != span.end.line {
                continue;
            }
            let line = &lines[(span.start.line - 1) as usize];
            let col = (span.start.column - 1) as usize;
            assert_eq!(line.highlight_at(col), highlight_id_for_name(scope));
        }
    }
}
