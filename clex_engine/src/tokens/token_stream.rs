//! Lossless token stream over a borrowed source
//!
//! Holds every token the lexer produced (trivia included) together with the
//! indices of the significant ones, so callers can walk either view while
//! spans stay exact.

use crate::logging::codes;
use crate::logging::Code;
use crate::tokens::token::{Token, TokenKind};
use crate::utils::{SourceMap, SourceSpan};

#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    source: &'a str,
    /// All tokens, including whitespace, newlines, comments and end of input
    all_tokens: Vec<Token<'a>>,
    /// Indices into all_tokens for significant tokens
    significant_indices: Vec<usize>,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str, tokens: Vec<Token<'a>>) -> Self {
        let significant_indices = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.kind.is_significant())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        crate::log_debug!("Token stream built",
            "total_tokens" => tokens.len(),
            "significant_tokens" => significant_indices.len()
        );

        Self {
            source,
            all_tokens: tokens,
            significant_indices,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn all_tokens(&self) -> &[Token<'a>] {
        &self.all_tokens
    }

    pub fn into_tokens(self) -> Vec<Token<'a>> {
        self.all_tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token<'a>> {
        self.all_tokens.iter()
    }

    /// Tokens that are neither trivia nor comments (end of input included)
    pub fn iter_significant(&self) -> impl Iterator<Item = &Token<'a>> {
        self.significant_indices
            .iter()
            .filter_map(|&i| self.all_tokens.get(i))
    }

    pub fn significant(&self, n: usize) -> Option<&Token<'a>> {
        self.significant_indices
            .get(n)
            .and_then(|&i| self.all_tokens.get(i))
    }

    pub fn len(&self) -> usize {
        self.all_tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_tokens.is_empty()
    }

    pub fn significant_count(&self) -> usize {
        self.significant_indices.len()
    }

    pub fn count_kind(&self, kind: TokenKind) -> usize {
        self.all_tokens.iter().filter(|t| t.kind == kind).count()
    }

    pub fn has_end_of_input(&self) -> bool {
        matches!(
            self.all_tokens.last(),
            Some(token) if token.kind == TokenKind::EndOfInput
        )
    }

    /// Token covering byte `offset`
    pub fn token_at(&self, offset: usize) -> Option<&Token<'a>> {
        let idx = self
            .all_tokens
            .partition_point(|token| token.end.offset <= offset);
        self.all_tokens
            .get(idx)
            .filter(|token| token.start.offset <= offset && offset < token.end.offset)
    }

    /// Concatenated token text; equals the source for a lexer-produced stream
    pub fn reconstruct(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        for token in &self.all_tokens {
            out.push_str(token.text);
        }
        out
    }

    /// Check that tokens are contiguous, ordered, match their source slices
    /// and together cover the whole source.
    pub fn validate_spans(&self) -> Result<(), TokenStreamError> {
        let mut expected_offset = 0;

        for (index, token) in self.all_tokens.iter().enumerate() {
            if token.start.offset != expected_offset {
                return Err(TokenStreamError::Gap {
                    index,
                    expected: expected_offset,
                    found: token.start.offset,
                });
            }
            if token.end.offset < token.start.offset {
                return Err(TokenStreamError::InvertedSpan { index });
            }
            match token.span().slice(self.source) {
                Some(slice) if slice == token.text => {}
                _ => return Err(TokenStreamError::TextMismatch { index }),
            }
            expected_offset = token.end.offset;
        }

        if expected_offset != self.source.len() {
            return Err(TokenStreamError::IncompleteCoverage {
                covered: expected_offset,
                total: self.source.len(),
            });
        }

        Ok(())
    }

    /// Render `message` with a caret under `span`
    pub fn format_error(&self, span: SourceSpan, message: &str) -> String {
        SourceMap::new(self.source).format_error(&span, message)
    }
}

impl<'s, 'a> IntoIterator for &'s TokenStream<'a> {
    type Item = &'s Token<'a>;
    type IntoIter = std::slice::Iter<'s, Token<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.all_tokens.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenStreamError {
    #[error("Token {index} starts at byte {found}, expected {expected}")]
    Gap {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("Token {index} ends before it starts")]
    InvertedSpan { index: usize },
    #[error("Token {index} text does not match its source span")]
    TextMismatch { index: usize },
    #[error("Tokens cover {covered} of {total} bytes")]
    IncompleteCoverage { covered: usize, total: usize },
}

impl TokenStreamError {
    pub fn error_code(&self) -> Code {
        codes::system::INTERNAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::CommentKind;
    use crate::utils::Position;
    use assert_matches::assert_matches;

    fn build<'a>(source: &'a str, parts: &[(TokenKind, &'a str)]) -> TokenStream<'a> {
        let mut pos = Position::start();
        let mut tokens = Vec::new();
        for &(kind, text) in parts {
            let end = pos.advance_str(text);
            tokens.push(Token::new(kind, pos, end, text));
            pos = end;
        }
        tokens.push(Token::end_of_input(pos));
        TokenStream::new(source, tokens)
    }

    #[test]
    fn test_significant_view_skips_trivia_and_comments() {
        let source = "x /*c*/\n;";
        let stream = build(
            source,
            &[
                (TokenKind::Identifier, "x"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Comment(CommentKind::Block), "/*c*/"),
                (TokenKind::Newline, "\n"),
                (TokenKind::Punctuation, ";"),
            ],
        );

        let kinds: Vec<TokenKind> = stream.iter_significant().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Punctuation,
                TokenKind::EndOfInput
            ]
        );
        assert_eq!(stream.len(), 6);
        assert_eq!(stream.significant_count(), 3);
        assert_eq!(stream.significant(1).map(|t| t.text), Some(";"));
        assert!(stream.has_end_of_input());
    }

    #[test]
    fn test_reconstruct_and_validate() {
        let source = "a+b";
        let stream = build(
            source,
            &[
                (TokenKind::Identifier, "a"),
                (TokenKind::Operator, "+"),
                (TokenKind::Identifier, "b"),
            ],
        );
        assert_eq!(stream.reconstruct(), source);
        assert!(stream.validate_spans().is_ok());
        assert_eq!(stream.token_at(1).map(|t| t.text), Some("+"));
        assert_eq!(stream.token_at(3), None);
        assert_eq!(stream.count_kind(TokenKind::Identifier), 2);
    }

    #[test]
    fn test_validate_detects_incomplete_coverage() {
        let stream = build("a+b", &[(TokenKind::Identifier, "a")]);
        assert_matches!(
            stream.validate_spans(),
            Err(TokenStreamError::IncompleteCoverage {
                covered: 1,
                total: 3
            })
        );
    }

    #[test]
    fn test_validate_detects_text_mismatch() {
        let stream = build("a+b", &[(TokenKind::Identifier, "x"), (TokenKind::Operator, "+b")]);
        assert_matches!(
            stream.validate_spans(),
            Err(TokenStreamError::TextMismatch { index: 0 })
        );
    }
}
