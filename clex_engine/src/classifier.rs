//! Refinement of raw token kinds against a rule table

use crate::rules::RuleTable;
use crate::tokens::{Token, TokenKind};

/// Refined kind for a raw token.
///
/// Identifiers become keywords on an exact table hit. Operator and
/// punctuation text is confirmed against the table; anything else passes
/// through unchanged. Contextual keywords stay identifiers.
pub fn classify(raw_kind: TokenKind, text: &str, rules: &RuleTable) -> TokenKind {
    match raw_kind {
        TokenKind::Identifier => rules
            .keyword_kind(text)
            .map(TokenKind::Keyword)
            .unwrap_or(TokenKind::Identifier),
        TokenKind::Operator | TokenKind::Punctuation => {
            if rules.is_operator(text) {
                TokenKind::Operator
            } else if rules.is_punctuation(text) {
                TokenKind::Punctuation
            } else {
                TokenKind::Invalid
            }
        }
        other => other,
    }
}

pub fn classify_token<'a>(token: Token<'a>, rules: &RuleTable) -> Token<'a> {
    let kind = classify(token.kind, token.text, rules);
    token.with_kind(kind)
}
