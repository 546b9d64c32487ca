//! # clex
//!
//! Highlights C and C++ files and prints spans, tokens or per-line
//! highlights as text or JSON.

mod render;

use clap::Parser;
use clex_engine::batch::{self, BatchConfig, BatchError, BatchResults};
use clex_engine::config::compile_time::batch_processing::MAX_WORKER_THREADS;
use clex_engine::config::{ConfigError, RuntimeConfig};
use clex_engine::logging::codes;
use clex_engine::rules::UnknownLanguage;
use clex_engine::{logging, Language, RuleSet};
use render::{OutputFormat, OutputMode, Renderer};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "clex", version, about = "Lexer-based syntax highlighting for C and C++")]
struct Cli {
    /// Files or directories to highlight
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Language for every input instead of detecting it from the extension
    #[arg(long, value_parser = parse_language)]
    lang: Option<Language>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Dump classified tokens instead of spans
    #[arg(long, conflicts_with = "lines")]
    tokens: bool,

    /// Dump per-line highlight tokens
    #[arg(long)]
    lines: bool,

    /// Keep adjacent spans of the same kind separate
    #[arg(long)]
    no_merge: bool,

    /// Worker threads (default: number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Don't search subdirectories
    #[arg(long)]
    no_recursive: bool,

    #[arg(long)]
    max_files: Option<usize>,

    /// Runtime preferences TOML file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Exit with status 1 when any diagnostic is reported
    #[arg(long)]
    deny_diagnostics: bool,

    /// Stop at the first file that cannot be read
    #[arg(long)]
    fail_fast: bool,

    /// Suppress the summary and progress output on stderr
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("Logging initialization failed: {0}")]
    Logging(String),

    #[error("Cannot write output: {0}")]
    Output(#[from] io::Error),
}

fn parse_language(value: &str) -> Result<Language, String> {
    value.parse().map_err(|e: UnknownLanguage| e.to_string())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            match &error {
                CliError::Config(config_error) => {
                    logging::safe_log_error(config_error.error_code(), &config_error.to_string())
                }
                CliError::Logging(message) => {
                    logging::safe_log_error(codes::system::INITIALIZATION_FAILURE, message)
                }
                _ => {}
            }
            eprintln!("error: {}", error);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let mut runtime = match &cli.config {
        Some(path) => RuntimeConfig::from_toml_file(path)?,
        None => RuntimeConfig::default(),
    };
    apply_cli_overrides(cli, &mut runtime);

    logging::config::init_runtime_preferences(runtime.logging.clone()).map_err(CliError::Logging)?;
    logging::init_global_logging().map_err(CliError::Logging)?;

    let batch_config = build_batch_config(cli, &runtime);
    log::debug!(
        "threads={} recursive={} language={:?}",
        batch_config.max_threads,
        batch_config.recursive,
        batch_config.language_override
    );

    let files = batch::collect_inputs(&cli.paths, &batch_config)?;
    log::info!("highlighting {} file(s)", files.len());

    let rules = Arc::new(RuleSet::new());
    let results = batch::process_files(&files, &batch_config, Arc::clone(&rules));

    let renderer = Renderer {
        format: cli.format,
        mode: output_mode(cli),
        rules: &rules,
        lexical: runtime.lexical.clone(),
        headers: files.len() > 1,
    };
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    renderer.render(&mut out, &results.successful_files)?;
    out.flush()?;

    report(cli, &results);
    Ok(exit_code(cli, &results))
}

/// Command-line flags win over the preferences file
fn apply_cli_overrides(cli: &Cli, runtime: &mut RuntimeConfig) {
    if cli.no_merge {
        runtime.highlight.merge_adjacent_spans = false;
    }
    if cli.quiet {
        runtime.logging.enable_cargo_style_output = false;
    }
}

fn build_batch_config(cli: &Cli, runtime: &RuntimeConfig) -> BatchConfig {
    BatchConfig {
        max_threads: cli
            .threads
            .unwrap_or_else(num_cpus::get)
            .clamp(1, MAX_WORKER_THREADS),
        recursive: !cli.no_recursive,
        max_files: cli.max_files,
        progress_reporting: false,
        fail_fast: cli.fail_fast,
        language_override: cli.lang,
        highlight: runtime.highlight.clone(),
        lexical: runtime.lexical.clone(),
    }
}

fn output_mode(cli: &Cli) -> OutputMode {
    if cli.tokens {
        OutputMode::Tokens
    } else if cli.lines {
        OutputMode::Lines
    } else {
        OutputMode::Spans
    }
}

fn report(cli: &Cli, results: &BatchResults) {
    for (path, error) in &results.failed_files {
        eprintln!("error[{}]: {}: {}", error.error_code(), path.display(), error);
    }
    if cli.quiet {
        return;
    }
    logging::print_cargo_style_summary();
    eprintln!("{}", results.summary());
}

/// 2 when a file could not be read, 1 for diagnostics under `--deny-diagnostics`
fn exit_code(cli: &Cli, results: &BatchResults) -> ExitCode {
    if results.failure_count() > 0 {
        ExitCode::from(2)
    } else if cli.deny_diagnostics && results.total_diagnostics() > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("clex").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_options() {
        let cli = parse(&[
            "src",
            "--lang",
            "c++",
            "--threads",
            "4",
            "--no-recursive",
            "--format",
            "json",
            "--tokens",
        ]);
        assert_eq!(cli.lang, Some(Language::Cpp));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(output_mode(&cli), OutputMode::Tokens);

        let config = build_batch_config(&cli, &RuntimeConfig::default());
        assert_eq!(config.max_threads, 4.min(MAX_WORKER_THREADS));
        assert!(!config.recursive);
        assert_eq!(config.language_override, Some(Language::Cpp));
    }

    #[test]
    fn test_usage_errors() {
        assert!(Cli::try_parse_from(["clex"]).is_err());
        assert!(Cli::try_parse_from(["clex", "a.c", "--lang", "rust"]).is_err());
        assert!(Cli::try_parse_from(["clex", "a.c", "--tokens", "--lines"]).is_err());
    }

    #[test]
    fn test_thread_count_is_capped() {
        let cli = parse(&["a.c", "--threads", "10000"]);
        let config = build_batch_config(&cli, &RuntimeConfig::default());
        assert_eq!(config.max_threads, MAX_WORKER_THREADS);

        let cli = parse(&["a.c", "--threads", "0"]);
        assert_eq!(build_batch_config(&cli, &RuntimeConfig::default()).max_threads, 1);
    }

    #[test]
    fn test_no_merge_applies_to_highlight_preferences() {
        let cli = parse(&["a.c", "--no-merge", "--lines"]);
        let mut runtime = RuntimeConfig::default();
        runtime.highlight.merge_adjacent_spans = true;
        apply_cli_overrides(&cli, &mut runtime);
        let config = build_batch_config(&cli, &runtime);
        assert!(!config.highlight.merge_adjacent_spans);
        assert_eq!(output_mode(&cli), OutputMode::Lines);
    }

    #[test]
    fn test_quiet_disables_cargo_style_summary() {
        let mut runtime = RuntimeConfig::default();
        runtime.highlight.merge_adjacent_spans = true;
        runtime.logging.enable_cargo_style_output = true;
        apply_cli_overrides(&parse(&["a.c", "--quiet"]), &mut runtime);
        assert!(!runtime.logging.enable_cargo_style_output);
        assert!(runtime.highlight.merge_adjacent_spans);
    }

    #[test]
    fn test_overrides_keep_file_preferences_without_flags() {
        let mut runtime = RuntimeConfig::default();
        runtime.highlight.merge_adjacent_spans = false;
        runtime.logging.enable_cargo_style_output = true;
        apply_cli_overrides(&parse(&["a.c"]), &mut runtime);
        assert!(!runtime.highlight.merge_adjacent_spans);
        assert!(runtime.logging.enable_cargo_style_output);
    }

    #[test]
    fn test_exit_codes() {
        let cli = parse(&["a.c", "--deny-diagnostics"]);
        let results = BatchResults::new();
        assert_eq!(exit_code(&cli, &results), ExitCode::SUCCESS);

        let mut failed = BatchResults::new();
        failed.add_failure(
            PathBuf::from("a.c"),
            BatchError::FileNotFound {
                path: "a.c".to_string(),
            },
        );
        assert_eq!(exit_code(&cli, &failed), ExitCode::from(2));
    }
}
