//! Token kinds and borrowed source tokens
use crate::rules::KeywordKind;
use crate::utils::{Position, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommentKind {
    /// `// ...` up to the end of the (logical) line
    Line,
    /// `/* ... */`
    Block,
}

/// Lexical category of a token.
///
/// The lexer only produces the raw kinds; `Keyword` appears after
/// classification against a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Keyword(KeywordKind),
    Number,
    String,
    Char,
    Comment(CommentKind),
    Preprocessor,
    Operator,
    Punctuation,
    Whitespace,
    Newline,
    EndOfInput,
    Invalid,
}

impl TokenKind {
    /// Dotted theme scope for this kind; `None` for trivia and end of input
    pub fn scope_name(&self) -> Option<&'static str> {
        match self {
            Self::Identifier => Some("variable"),
            Self::Keyword(kind) => Some(kind.scope_name()),
            Self::Number => Some("number"),
            Self::String => Some("string"),
            Self::Char => Some("string.char"),
            Self::Comment(CommentKind::Line) => Some("comment.line"),
            Self::Comment(CommentKind::Block) => Some("comment.block"),
            Self::Preprocessor => Some("preprocessor"),
            Self::Operator => Some("operator"),
            Self::Punctuation => Some("punctuation"),
            Self::Invalid => Some("error"),
            Self::Whitespace | Self::Newline | Self::EndOfInput => None,
        }
    }

    /// Whitespace and newlines
    pub fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline)
    }

    /// Anything a parser would look at: not trivia, not a comment
    pub fn is_significant(&self) -> bool {
        !self.is_trivia() && !matches!(self, Self::Comment(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Number | Self::String | Self::Char)
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, Self::Keyword(_))
    }

    /// Short label used in token dumps
    pub fn label(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Keyword(_) => "keyword",
            Self::Number => "number",
            Self::String => "string",
            Self::Char => "char",
            Self::Comment(CommentKind::Line) => "line-comment",
            Self::Comment(CommentKind::Block) => "block-comment",
            Self::Preprocessor => "preprocessor",
            Self::Operator => "operator",
            Self::Punctuation => "punctuation",
            Self::Whitespace => "whitespace",
            Self::Newline => "newline",
            Self::EndOfInput => "end-of-input",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(kind) => write!(f, "keyword({:?})", kind),
            other => f.write_str(other.label()),
        }
    }
}

/// A token borrowing its text from the source.
///
/// `text` is exactly `source[start.offset..end.offset]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub start: Position,
    pub end: Position,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, start: Position, end: Position, text: &'a str) -> Self {
        debug_assert!(end.offset >= start.offset);
        debug_assert_eq!(end.offset - start.offset, text.len());
        Self {
            kind,
            start,
            end,
            text,
        }
    }

    /// Empty `EndOfInput` token at `pos`
    pub fn end_of_input(pos: Position) -> Self {
        Self::new(TokenKind::EndOfInput, pos, pos, "")
    }

    pub fn span(&self) -> SourceSpan {
        SourceSpan::new(self.start, self.end)
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn with_kind(self, kind: TokenKind) -> Self {
        Self { kind, ..self }
    }

    /// Text shortened for log output
    pub fn preview(&self, max_chars: usize) -> String {
        if self.text.chars().count() <= max_chars {
            self.text.to_string()
        } else {
            let head: String = self.text.chars().take(max_chars).collect();
            format!("{}...", head)
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} at {}", self.kind, self.text, self.start)
    }
}
