//! Output rendering for highlighted files

use clex_engine::config::compile_time::lexical::MAX_TOKEN_PREVIEW_LENGTH;
use clex_engine::config::LexicalPreferences;
use clex_engine::highlight::{highlight_name, DocumentHighlights, HighlightToken};
use clex_engine::{tokenize_with_preferences, Diagnostic, FileHighlights, Language, RuleSet, Token};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// What each file is rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Spans,
    Tokens,
    Lines,
}

pub struct Renderer<'r> {
    pub format: OutputFormat,
    pub mode: OutputMode,
    pub rules: &'r RuleSet,
    pub lexical: LexicalPreferences,
    /// Print a `==> path <==` header before each file in text output
    pub headers: bool,
}

#[derive(Serialize)]
struct TokenDump<'a> {
    path: &'a Path,
    language: Language,
    tokens: Vec<Token<'a>>,
    diagnostics: &'a [Diagnostic],
}

#[derive(Serialize)]
struct LineDump<'a> {
    path: &'a Path,
    highlight_names: &'static [&'static str],
    #[serde(flatten)]
    document: DocumentHighlights,
    diagnostics: &'a [Diagnostic],
}

impl Renderer<'_> {
    pub fn render<W: Write>(&self, out: &mut W, files: &[FileHighlights]) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                for file in files {
                    self.render_text(out, file)?;
                }
                Ok(())
            }
            OutputFormat::Json => self.render_json(out, files),
        }
    }

    fn render_text<W: Write>(&self, out: &mut W, file: &FileHighlights) -> io::Result<()> {
        if self.headers {
            writeln!(
                out,
                "==> {} [{}] <==",
                file.path.display(),
                file.result.language.display_name()
            )?;
        }

        match self.mode {
            OutputMode::Spans => {
                for span in &file.result.spans {
                    let text = span.text(&file.source).unwrap_or_default();
                    writeln!(
                        out,
                        "{}-{} {} {}",
                        span.start,
                        span.end,
                        span.scope_name().unwrap_or(span.kind.label()),
                        preview(text)
                    )?;
                }
            }
            OutputMode::Tokens => {
                let table = self.rules.table(file.result.language);
                let output = tokenize_with_preferences(&file.source, table, self.quiet_lexical());
                for token in output.stream.iter() {
                    writeln!(out, "{} {} {}", token.start, token.kind.label(), preview(token.text))?;
                }
            }
            OutputMode::Lines => {
                let document = DocumentHighlights::from_result(&file.source, &file.result);
                for (index, line) in document.lines.iter().enumerate() {
                    writeln!(out, "{}: {}", index + 1, format_line(&line.tokens))?;
                }
            }
        }

        for diagnostic in &file.result.diagnostics {
            writeln!(out, "{}:{}", file.path.display(), diagnostic)?;
        }
        if file.result.dropped_diagnostics > 0 {
            writeln!(
                out,
                "{}: {} further diagnostic(s) suppressed",
                file.path.display(),
                file.result.dropped_diagnostics
            )?;
        }
        Ok(())
    }

    fn render_json<W: Write>(&self, out: &mut W, files: &[FileHighlights]) -> io::Result<()> {
        match self.mode {
            OutputMode::Spans => serde_json::to_writer_pretty(&mut *out, files)?,
            OutputMode::Tokens => {
                let dumps: Vec<TokenDump<'_>> = files
                    .iter()
                    .map(|file| {
                        let table = self.rules.table(file.result.language);
                        let output =
                            tokenize_with_preferences(&file.source, table, self.quiet_lexical());
                        TokenDump {
                            path: &file.path,
                            language: file.result.language,
                            tokens: output.stream.into_tokens(),
                            diagnostics: &file.result.diagnostics,
                        }
                    })
                    .collect();
                serde_json::to_writer_pretty(&mut *out, &dumps)?;
            }
            OutputMode::Lines => {
                let dumps: Vec<LineDump<'_>> = files
                    .iter()
                    .map(|file| LineDump {
                        path: &file.path,
                        highlight_names: clex_engine::highlight::HIGHLIGHT_NAMES,
                        document: DocumentHighlights::from_result(&file.source, &file.result),
                        diagnostics: &file.result.diagnostics,
                    })
                    .collect();
                serde_json::to_writer_pretty(&mut *out, &dumps)?;
            }
        }
        writeln!(out)
    }

    /// Diagnostics were already logged while highlighting
    fn quiet_lexical(&self) -> LexicalPreferences {
        LexicalPreferences {
            log_diagnostics: false,
            ..self.lexical.clone()
        }
    }
}

fn format_line(tokens: &[HighlightToken]) -> String {
    tokens
        .iter()
        .map(|token| {
            format!(
                "{}-{} {}",
                token.start_col,
                token.end_col,
                highlight_name(token.highlight).unwrap_or("?")
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escaped and shortened source text
fn preview(text: &str) -> String {
    let escaped: String = text.escape_debug().collect();
    if escaped.chars().count() <= MAX_TOKEN_PREVIEW_LENGTH {
        format!("\"{}\"", escaped)
    } else {
        let head: String = escaped.chars().take(MAX_TOKEN_PREVIEW_LENGTH).collect();
        format!("\"{}\"...", head)
    }
}
