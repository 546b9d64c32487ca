//! Shared primitive types used across the scanner, lexer and highlighter.

pub mod span;

pub use span::{Position, SourceMap, SourceSpan};
