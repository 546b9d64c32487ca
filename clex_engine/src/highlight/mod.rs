//! Syntax highlighting over the lexer and classifier
//!
//! - [`Highlighter`] - lazy iterator of merged [`Span`]s
//! - [`highlight`] - whole-text request returning a [`HighlightResult`]
//! - [`line_highlights`] / [`DocumentHighlights`] - spans cut into per-line
//!   tokens keyed by [`HighlightId`]

pub mod engine;
pub mod lines;
pub mod scopes;

pub use engine::{highlight, highlight_with_preferences, HighlightResult, Highlighter, Span};
pub use lines::{line_highlights, DocumentHighlights, HighlightToken, LineHighlights};
pub use scopes::{highlight_id_for_name, highlight_name, HighlightId, HIGHLIGHT_NAMES};
