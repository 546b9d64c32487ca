//! Lazy span producer: lexer, then classifier, then merging

use crate::classifier::classify;
use crate::config::runtime::{HighlightPreferences, LexicalPreferences};
use crate::diagnostics::Diagnostic;
use crate::lexical::Lexer;
use crate::logging::codes;
use crate::rules::{Language, RuleSet, RuleTable};
use crate::tokens::TokenKind;
use crate::utils::Position;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A run of source text sharing one refined kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub kind: TokenKind,
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn scope_name(&self) -> Option<&'static str> {
        self.kind.scope_name()
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn text<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.start.offset..self.end.offset)
    }
}

/// Single-pass iterator of highlight spans over one source text.
///
/// Stopping early is fine; nothing needs cleaning up.
pub struct Highlighter<'a> {
    lexer: Lexer<'a>,
    rules: &'a RuleTable,
    preferences: HighlightPreferences,
    pending: Option<Span>,
    done: bool,
}

impl<'a> Highlighter<'a> {
    pub fn new(text: &'a str, rules: &'a RuleTable) -> Self {
        Self::with_preferences(
            text,
            rules,
            HighlightPreferences::default(),
            LexicalPreferences::default(),
        )
    }

    pub fn with_preferences(
        text: &'a str,
        rules: &'a RuleTable,
        preferences: HighlightPreferences,
        lexical: LexicalPreferences,
    ) -> Self {
        Self {
            lexer: Lexer::with_preferences(text, rules, lexical),
            rules,
            preferences,
            pending: None,
            done: false,
        }
    }

    /// Diagnostics seen so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.lexer.diagnostics()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        let (sink, _) = self.lexer.finish();
        sink.into_diagnostics()
    }

    /// Diagnostics discarded past the per-request limit
    pub fn dropped_diagnostics(&self) -> usize {
        self.lexer.dropped_diagnostics()
    }
}

impl Iterator for Highlighter<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        loop {
            if self.done {
                return self.pending.take();
            }

            let token = match self.lexer.next() {
                Some(token) if token.kind != TokenKind::EndOfInput => token,
                _ => {
                    self.done = true;
                    continue;
                }
            };

            let kind = classify(token.kind, token.text, self.rules);

            if kind.is_trivia() && !self.preferences.include_trivia {
                // dropped trivia still breaks a merge run
                match self.pending.take() {
                    Some(span) => return Some(span),
                    None => continue,
                }
            }

            if self.preferences.merge_adjacent_spans {
                if let Some(pending) = self.pending.as_mut() {
                    if pending.kind == kind && pending.end.offset == token.start.offset {
                        pending.end = token.end;
                        continue;
                    }
                }
            }

            let span = Span {
                kind,
                start: token.start,
                end: token.end,
            };
            if let Some(previous) = self.pending.replace(span) {
                return Some(previous);
            }
        }
    }
}

/// Output of a whole-text highlight request
#[derive(Debug, Clone, Serialize)]
pub struct HighlightResult {
    pub language: Language,
    pub spans: Vec<Span>,
    pub diagnostics: Vec<Diagnostic>,
    pub dropped_diagnostics: usize,
}

impl HighlightResult {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Highlight `text` as `language` with default preferences
pub fn highlight(text: &str, language: Language, rules: &RuleSet) -> HighlightResult {
    highlight_with_preferences(
        text,
        language,
        rules,
        &HighlightPreferences::default(),
        LexicalPreferences::default(),
    )
}

pub fn highlight_with_preferences(
    text: &str,
    language: Language,
    rules: &RuleSet,
    preferences: &HighlightPreferences,
    lexical: LexicalPreferences,
) -> HighlightResult {
    let started = Instant::now();
    let mut highlighter =
        Highlighter::with_preferences(text, rules.table(language), preferences.clone(), lexical);
    let spans: Vec<Span> = highlighter.by_ref().collect();
    let dropped_diagnostics = highlighter.dropped_diagnostics();
    let diagnostics = highlighter.into_diagnostics();

    crate::log_success!(
        codes::success::HIGHLIGHTING_COMPLETE,
        "Highlighting complete",
        "language" => language.display_name(),
        "spans" => spans.len(),
        "diagnostics" => diagnostics.len(),
        "duration_ms" => format!("{:.3}", started.elapsed().as_secs_f64() * 1000.0)
    );

    HighlightResult {
        language,
        spans,
        diagnostics,
        dropped_diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::rules::KeywordKind;
    use crate::tokens::CommentKind;

    fn quiet() -> LexicalPreferences {
        LexicalPreferences {
            log_diagnostics: false,
            ..Default::default()
        }
    }

    fn spans(text: &str, language: Language, prefs: HighlightPreferences) -> Vec<(TokenKind, String)> {
        let rules = RuleSet::new();
        highlight_with_preferences(text, language, &rules, &prefs, quiet())
            .spans
            .iter()
            .map(|s| (s.kind, s.text(text).unwrap_or_default().to_string()))
            .collect()
    }

    fn defaults() -> HighlightPreferences {
        HighlightPreferences {
            merge_adjacent_spans: true,
            include_trivia: true,
        }
    }

    #[test]
    fn test_spans_cover_input_contiguously() {
        let text = "int main() {\n    return 0;\n}\n";
        let rules = RuleSet::new();
        let result = highlight_with_preferences(text, Language::C, &rules, &defaults(), quiet());

        assert_eq!(result.spans.first().map(|s| s.start.offset), Some(0));
        assert_eq!(result.spans.last().map(|s| s.end.offset), Some(text.len()));
        for pair in result.spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_ne!(pair[0].kind, pair[1].kind);
        }
        assert_eq!(result.language, Language::C);
        assert!(!result.has_diagnostics());
    }

    #[test]
    fn test_adjacent_same_kind_merges() {
        let result = spans("();", Language::C, defaults());
        assert_eq!(result, vec![(TokenKind::Punctuation, "();".to_string())]);

        let unmerged = spans(
            "();",
            Language::C,
            HighlightPreferences {
                merge_adjacent_spans: false,
                include_trivia: true,
            },
        );
        assert_eq!(unmerged.len(), 3);
    }

    #[test]
    fn test_trivia_can_be_dropped() {
        let result = spans("int x ;\n", Language::C, prefs_no_trivia());
        assert_eq!(
            result,
            vec![
                (TokenKind::Keyword(KeywordKind::Type), "int".to_string()),
                (TokenKind::Identifier, "x".to_string()),
                (TokenKind::Punctuation, ";".to_string()),
            ]
        );

        // trivia between two identifiers keeps them apart
        let result = spans("a b", Language::C, prefs_no_trivia());
        assert_eq!(result.len(), 2);
    }

    fn prefs_no_trivia() -> HighlightPreferences {
        HighlightPreferences {
            merge_adjacent_spans: true,
            include_trivia: false,
        }
    }

    #[test]
    fn test_idempotent() {
        let rules = RuleSet::new();
        let text = "#include <stdio.h>\nauto x = a<=>b; // cmp\n";
        let first = highlight(text, Language::Cpp, &rules);
        let second = highlight(text, Language::Cpp, &rules);
        assert_eq!(first.spans, second.spans);
        assert_eq!(first.diagnostics, second.diagnostics);
    }

    #[test]
    fn test_spaceship_single_operator() {
        let result = spans("a<=>b", Language::Cpp, defaults());
        assert_eq!(result[1], (TokenKind::Operator, "<=>".to_string()));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_unterminated_comment_diagnostic() {
        let rules = RuleSet::new();
        let result = highlight_with_preferences(
            "/* never closed",
            Language::C,
            &rules,
            &defaults(),
            quiet(),
        );
        assert_eq!(result.spans.len(), 1);
        assert_eq!(result.spans[0].kind, TokenKind::Comment(CommentKind::Block));
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnterminatedComment);
        assert_eq!(result.diagnostics[0].position, Position::start());
    }

    #[test]
    fn test_lazy_iteration_can_stop_early() {
        let rules = RuleSet::new();
        let text = "a b c d e f";
        let mut highlighter = Highlighter::with_preferences(
            text,
            rules.table(Language::C),
            defaults(),
            quiet(),
        );
        let first = highlighter.next();
        assert_eq!(first.map(|s| s.kind), Some(TokenKind::Identifier));
        assert!(highlighter.diagnostics().is_empty());
    }

    #[test]
    fn test_empty_input_has_no_spans() {
        let rules = RuleSet::new();
        assert!(highlight("", Language::C, &rules).spans.is_empty());
    }

    #[test]
    fn test_span_scope_names() {
        let result = spans("return 1;", Language::C, defaults());
        assert_eq!(result[0].0.scope_name(), Some("keyword.control"));
        assert_eq!(result[1].0.scope_name(), None);
        assert_eq!(result[2].0.scope_name(), Some("number"));
    }
}
