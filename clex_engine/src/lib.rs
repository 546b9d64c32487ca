//! Lexical analysis and syntax highlighting for C and C++ sources.
//!
//! The pipeline is scanner, lexer, classifier, highlighter. Each stage is a
//! lazy iterator over borrowed source text; [`highlight`] and [`tokenize`]
//! collect a whole file in one call.

#[macro_use]
pub mod logging;

pub mod batch;
pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod highlight;
pub mod lexical;
pub mod rules;
pub mod scanner;
pub mod tokens;
pub mod utils;

pub use batch::{BatchConfig, BatchError, BatchResults, FileHighlights, SourceFile};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use highlight::{
    highlight, highlight_with_preferences, DocumentHighlights, HighlightResult, Highlighter, Span,
};
pub use lexical::{tokenize, tokenize_with_preferences, Lexer, LexicalOutput};
pub use rules::{KeywordKind, Language, RuleSet, RuleTable};
pub use tokens::{CommentKind, Token, TokenKind, TokenStream};
pub use utils::{Position, SourceSpan};
