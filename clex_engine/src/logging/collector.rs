//! Per-file event collection for batch runs with cargo-style output

use super::events::LogEvent;
use crate::config::compile_time::logging::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// File currently being processed on a thread
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub clean_files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
}

/// Thread-safe event store keyed by file path
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
    processing_start: Instant,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    fn lock_events(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Vec<LogEvent>>> {
        self.file_events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a file so clean files still count in the summary
    pub fn record_file_context(&self, context: &FileProcessingContext) {
        self.lock_events()
            .entry(context.file_path.clone())
            .or_default();
    }

    /// Record an event for a file, capped at `MAX_LOG_EVENTS_PER_FILE` plus one overflow note
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = self.lock_events();
        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(&format!(
                "Too many events for file (limit: {})",
                MAX_LOG_EVENTS_PER_FILE
            )));
        }
    }

    pub fn get_file_events(&self, file_path: &Path) -> Vec<LogEvent> {
        self.lock_events()
            .get(file_path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        self.lock_events().clone()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = self.lock_events();

        let mut summary = ProcessingSummary {
            total_files: events.len(),
            total_processing_time: self.processing_start.elapsed(),
            ..Default::default()
        };

        for file_events in events.values() {
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            let warnings = file_events.iter().filter(|e| e.is_warning()).count();

            if errors > 0 {
                summary.failed_files += 1;
            } else if warnings > 0 {
                summary.files_with_warnings += 1;
            } else {
                summary.clean_files += 1;
            }

            summary.total_errors += errors;
            summary.total_warnings += warnings;
        }

        summary
    }

    pub fn total_event_count(&self) -> usize {
        self.lock_events().values().map(|v| v.len()).sum()
    }

    /// (current, max, fraction) against `LOG_BUFFER_SIZE`
    pub fn get_capacity_info(&self) -> (usize, usize, f64) {
        let current = self.total_event_count();
        let max = LOG_BUFFER_SIZE;
        (current, max, current as f64 / max.max(1) as f64)
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn format_event_location(file_path: &Path, event: &LogEvent) -> String {
    event
        .span
        .as_ref()
        .map(|s| {
            format!(
                "\n  --> {}:{}:{}",
                file_path.display(),
                s.start().line,
                s.start().column
            )
        })
        .unwrap_or_default()
}

/// Render collected errors and warnings grouped by file, cargo style
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        let reportable: Vec<_> = events
            .iter()
            .filter(|e| e.is_error() || e.is_warning())
            .collect();
        if reportable.is_empty() {
            continue;
        }

        for event in reportable {
            let label = if event.is_error() { "error" } else { "warning" };
            output.push_str(&format!(
                "{}[{}]: {}{}\n",
                label,
                event.code.as_str(),
                event.message,
                format_event_location(file_path, event)
            ));

            for (key, value) in &event.context {
                if key != "file" && key != "file_id" {
                    output.push_str(&format!("  = {}: {}\n", key, value));
                }
            }

            if event.is_error() {
                output.push_str(&format!("  = help: {}\n", event.recommended_action()));
            }
        }

        output.push('\n');
    }

    let summary = collector.get_summary();
    output.push_str(&format!(
        "Checked {} file(s): {} error(s), {} warning(s)\n",
        summary.total_files, summary.total_errors, summary.total_warnings
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::{Position, SourceSpan};

    #[test]
    fn test_processing_summary() {
        let collector = ErrorCollector::new();

        let clean = FileProcessingContext::new(PathBuf::from("clean.c"), 0);
        collector.record_file_context(&clean);
        collector.record_event(
            Path::new("bad.c"),
            LogEvent::error(codes::file_processing::INVALID_ENCODING, "Not UTF-8"),
        );
        collector.record_event(
            Path::new("warn.cpp"),
            LogEvent::warning_with_code(codes::lexical::INVALID_CHARACTER, "Stray '@'"),
        );

        let summary = collector.get_summary();
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.clean_files, 1);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.files_with_warnings, 1);
    }

    #[test]
    fn test_per_file_event_cap() {
        let collector = ErrorCollector::new();
        let path = Path::new("noisy.c");

        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 5 {
            collector.record_event(path, LogEvent::warning("noise"));
        }

        assert_eq!(
            collector.get_file_events(path).len(),
            MAX_LOG_EVENTS_PER_FILE + 1
        );
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let span = SourceSpan::new(Position::new(4, 2, 1), Position::new(20, 2, 17));
        collector.record_event(
            Path::new("src/main.c"),
            LogEvent::warning_with_code(codes::lexical::UNTERMINATED_COMMENT, "Unterminated")
                .with_span(span)
                .with_context("file", "src/main.c"),
        );

        let output = format_cargo_style_errors(&collector);
        assert!(output.contains("warning[E022]: Unterminated"));
        assert!(output.contains("--> src/main.c:2:1"));
        assert!(!output.contains("= file:"));
        assert!(output.contains("1 warning(s)"));
    }
}
