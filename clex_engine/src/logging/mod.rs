//! Global logging for the clex engine
//!
//! Thread-safe global logger and error collector, per-thread file context
//! for batch runs, cargo-style summaries and the `log_*!` macros.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{ErrorCollector, FileProcessingContext, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, Logger, LoggingService, MemoryLogger, MultiLogger, StructuredLogger,
};

use crate::utils::SourceSpan;

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<Arc<ErrorCollector>> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the installed runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;
    init_global_logging_with_service(Arc::new(LoggingService::with_config()))?;

    crate::log_success!(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
        "profile" => crate::config::build_info::profile()
    );

    Ok(())
}

/// Initialize with a caller-supplied service
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())?;

    GLOBAL_ERROR_COLLECTOR
        .set(Arc::new(ErrorCollector::new()))
        .map_err(|_| "Global error collector already initialized".to_string())?;

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some() && GLOBAL_ERROR_COLLECTOR.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR
        .get()
        .map(|collector| collector.as_ref())
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

pub fn set_file_context(file_path: PathBuf, file_id: usize) {
    let context = FileProcessingContext::new(file_path, file_id);

    if let Some(collector) = try_get_global_error_collector() {
        collector.record_file_context(&context);
    }

    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

pub fn clear_file_context() {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with the file context set on this thread
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_file_context(file_path, file_id);
    let result = f();
    clear_file_context();
    result
}

pub fn get_current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn build_event(
    mut event: LogEvent,
    span: Option<SourceSpan>,
    context: Vec<(&str, &str)>,
) -> (LogEvent, Option<FileProcessingContext>) {
    if let Some(s) = span {
        event = event.with_span(s);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    let file_ctx = get_current_file_context();
    if let Some(ctx) = &file_ctx {
        if config::include_file_context() {
            event = event.with_context("file", &ctx.file_path.display().to_string());
            event = event.with_context("file_id", &ctx.file_id.to_string());
        }
    }

    (event, file_ctx)
}

/// Send to the global logger and, inside a file context, to the collector
fn dispatch(event: LogEvent, file_ctx: Option<FileProcessingContext>, collect: bool) {
    if collect {
        if let (Some(ctx), Some(collector)) = (file_ctx, try_get_global_error_collector()) {
            collector.record_event(&ctx.file_path, event.clone());
        }
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<SourceSpan>,
    context: Vec<(&str, &str)>,
) {
    let (event, file_ctx) = build_event(LogEvent::error(code, message), span, context);
    dispatch(event, file_ctx, true);
}

pub fn log_warning_with_context(
    code: Code,
    message: &str,
    span: Option<SourceSpan>,
    context: Vec<(&str, &str)>,
) {
    let (event, file_ctx) = build_event(LogEvent::warning_with_code(code, message), span, context);
    dispatch(event, file_ctx, true);
}

pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let (event, file_ctx) = build_event(LogEvent::success(code, message), None, context);
    dispatch(event, file_ctx, false);
}

pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let (event, file_ctx) = build_event(LogEvent::info(message), None, context);
    dispatch(event, file_ctx, false);
}

pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    let (event, file_ctx) = build_event(LogEvent::debug(message), None, context);
    dispatch(event, file_ctx, false);
}

// ============================================================================
// BATCH REPORTING
// ============================================================================

/// Print the cargo-style summary to stderr when enabled in preferences
pub fn print_cargo_style_summary() {
    if !config::use_cargo_style_output() {
        return;
    }
    if let Some(collector) = try_get_global_error_collector() {
        eprint!("{}", collector::format_cargo_style_errors(collector));
    }
}

pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));

    if let Some(collector) = try_get_global_error_collector() {
        let (current, max, fraction) = collector.get_capacity_info();
        diagnostics.push_str(&format!(
            "Capacity: {}/{} ({:.1}%)\n",
            current,
            max,
            fraction * 100.0
        ));
    }

    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

// ============================================================================
// SAFE FALLBACK LOGGING
// ============================================================================

/// Error logging that falls back to stderr when uninitialized
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_error(code, message);
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_context_management() {
        let file_path = PathBuf::from("lexer.c");

        assert!(get_current_file_context().is_none());

        set_file_context(file_path.clone(), 1);
        let context = get_current_file_context();
        assert_eq!(context.map(|c| c.file_path), Some(file_path));

        clear_file_context();
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_with_file_context() {
        let file_path = PathBuf::from("widget.cpp");

        let result = with_file_context(file_path.clone(), 2, || {
            let context = get_current_file_context().unwrap();
            assert_eq!(context.file_path, file_path);
            assert_eq!(context.file_id, 2);
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_build_event_attaches_file_context() {
        let (event, ctx) = with_file_context(PathBuf::from("a.h"), 7, || {
            build_event(
                LogEvent::warning_with_code(codes::lexical::INVALID_CHARACTER, "Stray '$'"),
                None,
                vec![("char", "$")],
            )
        });

        assert!(ctx.is_some());
        assert_eq!(event.context.get("char").map(String::as_str), Some("$"));
        if config::include_file_context() {
            assert_eq!(event.context.get("file").map(String::as_str), Some("a.h"));
        }
    }

    #[test]
    fn test_safe_logging_and_diagnostics() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
    }
}
