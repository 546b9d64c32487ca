//! Recoverable lexical problems
//!
//! Malformed input never stops the lexer. Each problem becomes a
//! [`Diagnostic`] in a side list, bounded by `lexical::MAX_DIAGNOSTICS`.

use crate::config::compile_time::lexical::MAX_DIAGNOSTICS;
use crate::logging::{codes, Code};
use crate::utils::{Position, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    UnterminatedComment,
    UnterminatedString,
    InvalidCharacter,
}

impl DiagnosticKind {
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnterminatedComment => codes::lexical::UNTERMINATED_COMMENT,
            Self::UnterminatedString => codes::lexical::UNTERMINATED_STRING,
            Self::InvalidCharacter => codes::lexical::INVALID_CHARACTER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub position: Position,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(position: Position, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            position,
            kind,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Code {
        self.kind.error_code()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: [{}] {}",
            self.position.line,
            self.position.column,
            self.code(),
            self.message
        )
    }
}

/// Bounded diagnostic list for one lexing pass
#[derive(Debug, Clone)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    limit: usize,
    dropped: usize,
    log_events: bool,
    include_positions: bool,
}

impl DiagnosticSink {
    pub fn new(log_events: bool, include_positions: bool) -> Self {
        Self::with_limit(MAX_DIAGNOSTICS, log_events, include_positions)
    }

    pub fn with_limit(limit: usize, log_events: bool, include_positions: bool) -> Self {
        Self {
            diagnostics: Vec::new(),
            limit,
            dropped: 0,
            log_events,
            include_positions,
        }
    }

    /// Record a problem at `position`. Past the limit only a counter moves;
    /// the first overflow is reported once.
    pub fn report(&mut self, position: Position, kind: DiagnosticKind, message: &str) {
        if self.diagnostics.len() >= self.limit {
            self.dropped += 1;
            if self.dropped == 1 && self.log_events {
                crate::log_warning!(
                    codes::lexical::DIAGNOSTIC_LIMIT_REACHED,
                    "Diagnostic limit reached; further diagnostics are counted only",
                    "limit" => self.limit
                );
            }
            return;
        }

        let message = if self.include_positions {
            format!("{} at line {}, column {}", message, position.line, position.column)
        } else {
            message.to_string()
        };

        if self.log_events {
            crate::logging::log_warning_with_context(
                kind.error_code(),
                &message,
                Some(SourceSpan::point(position)),
                Vec::new(),
            );
        }

        self.diagnostics.push(Diagnostic::new(position, kind, message));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics discarded after the limit was hit
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn count_kind(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }
}
