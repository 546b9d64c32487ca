//! Per-pass lexical statistics

use crate::config::runtime::LexicalPreferences;
use crate::tokens::{Token, TokenKind};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub identifier_tokens: usize,
    pub keyword_tokens: usize,
    pub number_tokens: usize,
    pub string_tokens: usize,
    pub char_tokens: usize,
    pub preprocessor_tokens: usize,
    pub operator_tokens: usize,
    pub punctuation_tokens: usize,
    pub whitespace_tokens: usize,
    pub newline_tokens: usize,
    pub comment_count: usize,
    pub invalid_chars: usize,
    /// Longest string or char literal, in bytes
    pub max_string_length: usize,

    /// Operator spelling to count, filled when `track_operator_patterns` is on
    pub operator_usage_patterns: HashMap<String, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token<'_>, preferences: &LexicalPreferences) {
        if token.kind == TokenKind::EndOfInput {
            return;
        }
        self.total_tokens += 1;

        if token.kind == TokenKind::Invalid {
            self.invalid_chars += 1;
        }

        if !preferences.collect_detailed_metrics {
            return;
        }

        match token.kind {
            TokenKind::Identifier => self.identifier_tokens += 1,
            TokenKind::Keyword(_) => self.keyword_tokens += 1,
            TokenKind::Number => self.number_tokens += 1,
            TokenKind::String => {
                self.string_tokens += 1;
                self.max_string_length = self.max_string_length.max(token.len());
            }
            TokenKind::Char => {
                self.char_tokens += 1;
                self.max_string_length = self.max_string_length.max(token.len());
            }
            TokenKind::Preprocessor => self.preprocessor_tokens += 1,
            TokenKind::Operator => {
                self.operator_tokens += 1;
                if preferences.track_operator_patterns {
                    *self
                        .operator_usage_patterns
                        .entry(token.text.to_string())
                        .or_insert(0) += 1;
                }
            }
            TokenKind::Punctuation => self.punctuation_tokens += 1,
            TokenKind::Whitespace => self.whitespace_tokens += 1,
            TokenKind::Newline => self.newline_tokens += 1,
            TokenKind::Comment(_) => self.comment_count += 1,
            TokenKind::Invalid | TokenKind::EndOfInput => {}
        }
    }

    /// Move an identifier count over to keywords once classification knows better
    pub(crate) fn record_keyword_promotion(&mut self) {
        self.identifier_tokens = self.identifier_tokens.saturating_sub(1);
        self.keyword_tokens += 1;
    }

    /// Tokens other than whitespace, newlines and comments
    pub fn significant_tokens(&self) -> usize {
        self.total_tokens
            .saturating_sub(self.whitespace_tokens + self.newline_tokens + self.comment_count)
    }

    /// Most frequent operator spellings, highest count first
    pub fn top_operators(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ops: Vec<(&str, usize)> = self
            .operator_usage_patterns
            .iter()
            .map(|(op, count)| (op.as_str(), *count))
            .collect();
        ops.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ops.truncate(n);
        ops
    }
}
