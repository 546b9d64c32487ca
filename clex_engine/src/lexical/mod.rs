//! Lexical analysis module
//!
//! [`Lexer`] is the streaming producer of raw tokens. The functions here run a
//! whole pass: lex, classify against a rule table, and collect the token
//! stream, diagnostics and metrics into a [`LexicalOutput`].

pub mod lexer;
pub mod metrics;

use crate::classifier::classify_token;
use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::diagnostics::Diagnostic;
use crate::logging::codes;
use crate::rules::RuleTable;
use crate::tokens::{TokenKind, TokenStream};
use std::time::Instant;

pub use lexer::{Lexer, LexerError};
pub use metrics::LexicalMetrics;

/// Everything one lexing pass produced
#[derive(Debug, Clone)]
pub struct LexicalOutput<'a> {
    /// Classified tokens, end of input included
    pub stream: TokenStream<'a>,
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics discarded once `MAX_DIAGNOSTICS` was reached
    pub dropped_diagnostics: usize,
    pub metrics: LexicalMetrics,
}

impl LexicalOutput<'_> {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Tokenize and classify `text` with default preferences
pub fn tokenize<'a>(text: &'a str, rules: &'a RuleTable) -> LexicalOutput<'a> {
    tokenize_with_preferences(text, rules, LexicalPreferences::default())
}

pub fn tokenize_with_preferences<'a>(
    text: &'a str,
    rules: &'a RuleTable,
    preferences: LexicalPreferences,
) -> LexicalOutput<'a> {
    let started = Instant::now();
    let mut lexer = Lexer::with_preferences(text, rules, preferences);
    let mut tokens = Vec::new();

    for token in lexer.by_ref() {
        tokens.push(classify_token(token, rules));
    }

    let detailed = lexer.preferences().collect_detailed_metrics;
    let (sink, mut metrics) = lexer.finish();
    if detailed {
        for token in &tokens {
            if matches!(token.kind, TokenKind::Keyword(_)) {
                metrics.record_keyword_promotion();
            }
        }
    }

    let dropped_diagnostics = sink.dropped();
    let diagnostics = sink.into_diagnostics();

    crate::log_success!(
        codes::success::TOKENIZATION_COMPLETE,
        "Tokenization complete",
        "language" => rules.language().display_name(),
        "tokens" => metrics.total_tokens,
        "diagnostics" => diagnostics.len(),
        "duration_ms" => format!("{:.3}", started.elapsed().as_secs_f64() * 1000.0)
    );

    LexicalOutput {
        stream: TokenStream::new(text, tokens),
        diagnostics,
        dropped_diagnostics,
        metrics,
    }
}

pub fn create_lexer<'a>(text: &'a str, rules: &'a RuleTable) -> Lexer<'a> {
    Lexer::new(text, rules)
}

/// Check that the lexical codes are registered and the generated limits are usable
pub fn validate_lexical_configuration() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::INVALID_CHARACTER,
        codes::lexical::UNTERMINATED_STRING,
        codes::lexical::UNTERMINATED_COMMENT,
        codes::lexical::LEXER_EXHAUSTED,
        codes::lexical::DIAGNOSTIC_LIMIT_REACHED,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    if MAX_DIAGNOSTICS == 0 {
        return Err("MAX_DIAGNOSTICS cannot be zero".to_string());
    }
    if MAX_RAW_STRING_DELIMITER_LENGTH == 0 || MAX_RAW_STRING_DELIMITER_LENGTH > 16 {
        return Err(format!(
            "MAX_RAW_STRING_DELIMITER_LENGTH must be between 1 and 16, got {}",
            MAX_RAW_STRING_DELIMITER_LENGTH
        ));
    }
    if MAX_TOKEN_PREVIEW_LENGTH == 0 {
        return Err("MAX_TOKEN_PREVIEW_LENGTH cannot be zero".to_string());
    }

    crate::log_debug!("Lexical limits validated",
        "max_diagnostics" => MAX_DIAGNOSTICS,
        "max_raw_delimiter" => MAX_RAW_STRING_DELIMITER_LENGTH
    );

    Ok(())
}
