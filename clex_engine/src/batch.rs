//! Batch highlighting of C/C++ files
//!
//! Directory discovery, bounded file loading and sequential or threaded
//! processing. Every file runs inside a logging file context so the error
//! collector can group events per file for the cargo-style summary.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::{HighlightPreferences, LexicalPreferences};
use crate::highlight::{highlight_with_preferences, HighlightResult};
use crate::logging::{self, codes};
use crate::rules::{Language, RuleSet};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    pub max_files: Option<usize>,
    pub progress_reporting: bool,
    pub fail_fast: bool,
    /// Language for every file instead of detecting it from the extension
    pub language_override: Option<Language>,
    pub highlight: HighlightPreferences,
    pub lexical: LexicalPreferences,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(MAX_WORKER_THREADS))
                .unwrap_or(4),
            recursive: true,
            max_files: None,
            progress_reporting: false,
            fail_fast: false,
            language_override: None,
            highlight: HighlightPreferences::default(),
            lexical: LexicalPreferences::default(),
        }
    }
}

impl BatchConfig {
    /// Thread count clamped to `1..=MAX_WORKER_THREADS`
    pub fn effective_threads(&self) -> usize {
        self.max_threads.clamp(1, MAX_WORKER_THREADS)
    }

    fn file_limit(&self) -> usize {
        self.max_files
            .unwrap_or(MAX_FILES_PER_BATCH)
            .min(MAX_FILES_PER_BATCH)
    }
}

/// A decoded source file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Detected from the extension; `None` for unrecognised extensions
    pub language: Option<Language>,
    pub text: String,
    pub size: u64,
}

impl SourceFile {
    pub fn is_large(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }

    pub fn line_count(&self) -> usize {
        crate::utils::SourceMap::new(&self.text).line_count()
    }
}

/// Highlighting output for one file
#[derive(Debug, Clone, Serialize)]
pub struct FileHighlights {
    pub path: PathBuf,
    #[serde(skip)]
    pub source: String,
    #[serde(flatten)]
    pub result: HighlightResult,
    pub duration_ms: f64,
}

impl FileHighlights {
    pub fn diagnostic_count(&self) -> usize {
        self.result.diagnostics.len() + self.result.dropped_diagnostics
    }
}

#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<FileHighlights>,
    pub failed_files: Vec<(PathBuf, BatchError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    pub fn total_diagnostics(&self) -> usize {
        self.successful_files
            .iter()
            .map(FileHighlights::diagnostic_count)
            .sum()
    }

    pub fn add_success(&mut self, file: FileHighlights) {
        self.successful_files.push(file);
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: BatchError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    pub fn merge(&mut self, other: BatchResults) {
        self.successful_files.extend(other.successful_files);
        self.failed_files.extend(other.failed_files);
        self.files_processed += other.files_processed;
    }

    /// Order results by path so threaded runs print deterministically
    pub fn sort_by_path(&mut self) {
        self.successful_files.sort_by(|a, b| a.path.cmp(&b.path));
        self.failed_files.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn summary(&self) -> String {
        format!(
            "Highlighted {} of {} file(s) ({:.1}%), {} failed, {} diagnostic(s), {:.2}s total",
            self.success_count(),
            self.files_processed,
            self.success_rate() * 100.0,
            self.failure_count(),
            self.total_diagnostics(),
            self.processing_duration.as_secs_f64()
        )
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No C or C++ files found in directory: {path}")]
    NoFilesFound { path: String },

    #[error("Too many files: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Not a regular file: {path}")]
    InvalidPath { path: String },

    #[error("File too large: {path} is {size} bytes (max: {max_size})")]
    FileTooLarge { path: String, size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 in {path} at byte {offset}")]
    InvalidEncoding { path: String, offset: usize },

    #[error("Cannot determine language of {path}; use a .c/.h/.cpp style extension or a language override")]
    UnknownLanguage { path: String },

    #[error("I/O error on {path}: {message}")]
    IoError { path: String, message: String },

    #[error("Thread pool error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> logging::Code {
        match self {
            BatchError::DirectoryNotFound { .. } | BatchError::FileNotFound { .. } => {
                codes::file_processing::FILE_NOT_FOUND
            }
            BatchError::NoFilesFound { .. } | BatchError::UnknownLanguage { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            BatchError::TooManyFiles { .. } | BatchError::FileTooLarge { .. } => {
                codes::file_processing::FILE_TOO_LARGE
            }
            BatchError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            BatchError::PermissionDenied { .. } => codes::file_processing::PERMISSION_DENIED,
            BatchError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            BatchError::IoError { .. } => codes::file_processing::IO_ERROR,
            BatchError::ThreadError { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(path: &Path, error: &io::Error) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => BatchError::FileNotFound { path },
            io::ErrorKind::PermissionDenied => BatchError::PermissionDenied { path },
            _ => BatchError::IoError {
                path,
                message: error.to_string(),
            },
        }
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// Files under `dir_path` with a C or C++ extension, sorted
pub fn discover_source_files(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    crate::log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        return Err(BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        });
    }

    let limit = config.file_limit();
    let mut files = Vec::new();
    visit_directory(dir_path, &mut files, config.recursive, limit)?;

    if files.is_empty() {
        return Err(BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
        });
    }

    files.sort();

    crate::log_success!(
        codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
        "File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

fn visit_directory(
    dir_path: &Path,
    files: &mut Vec<PathBuf>,
    recursive: bool,
    limit: usize,
) -> Result<(), BatchError> {
    let mut entries = fs::read_dir(dir_path)
        .map_err(|e| BatchError::from_io(dir_path, &e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| BatchError::from_io(dir_path, &e))?;
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        if files.len() >= limit {
            crate::log_warning!(
                codes::file_processing::FILE_TOO_LARGE,
                "Reached maximum file limit",
                "files_found" => files.len(),
                "limit" => limit
            );
            return Ok(());
        }

        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| BatchError::from_io(&path, &e))?;
        if file_type.is_dir() {
            if recursive {
                visit_directory(&path, files, recursive, limit)?;
            }
        } else if file_type.is_symlink() && path.is_dir() {
            // Symlinked directories are never followed
            crate::log_debug!("Skipping symlinked directory", "path" => path.display());
        } else if is_source_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn is_source_file(path: &Path) -> bool {
    path.is_file() && Language::from_path(path).is_some()
}

/// Expand command-line inputs: directories are searched, files kept as given
pub fn collect_inputs(inputs: &[PathBuf], config: &BatchConfig) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(discover_source_files(input, config)?);
        } else {
            files.push(input.clone());
        }
    }

    let limit = config.file_limit();
    if files.len() > limit {
        return Err(BatchError::TooManyFiles {
            count: files.len(),
            max: limit,
        });
    }
    Ok(files)
}

// ============================================================================
// SINGLE FILE
// ============================================================================

/// Read and decode one file, enforcing `MAX_FILE_SIZE` and strict UTF-8
pub fn load_source(path: &Path) -> Result<SourceFile, BatchError> {
    let metadata = fs::metadata(path).map_err(|e| BatchError::from_io(path, &e))?;
    if !metadata.is_file() {
        return Err(BatchError::InvalidPath {
            path: path.display().to_string(),
        });
    }

    let size = metadata.len();
    if size > MAX_FILE_SIZE {
        return Err(BatchError::FileTooLarge {
            path: path.display().to_string(),
            size,
            max_size: MAX_FILE_SIZE,
        });
    }

    let bytes = fs::read(path).map_err(|e| BatchError::from_io(path, &e))?;
    let text = String::from_utf8(bytes).map_err(|e| BatchError::InvalidEncoding {
        path: path.display().to_string(),
        offset: e.utf8_error().valid_up_to(),
    })?;

    if text.is_empty() {
        crate::log_warning!(
            codes::file_processing::EMPTY_FILE,
            "Empty source file",
            "file" => path.display()
        );
    }

    Ok(SourceFile {
        path: path.to_path_buf(),
        language: Language::from_path(path),
        text,
        size,
    })
}

pub fn highlight_file(
    path: &Path,
    language_override: Option<Language>,
    rules: &RuleSet,
    preferences: &HighlightPreferences,
) -> Result<FileHighlights, BatchError> {
    highlight_file_with_preferences(
        path,
        language_override,
        rules,
        preferences,
        LexicalPreferences::default(),
    )
}

pub fn highlight_file_with_preferences(
    path: &Path,
    language_override: Option<Language>,
    rules: &RuleSet,
    preferences: &HighlightPreferences,
    lexical: LexicalPreferences,
) -> Result<FileHighlights, BatchError> {
    let started = Instant::now();
    let source = load_source(path)?;
    let language = language_override
        .or(source.language)
        .ok_or_else(|| BatchError::UnknownLanguage {
            path: path.display().to_string(),
        })?;

    let result = highlight_with_preferences(&source.text, language, rules, preferences, lexical);
    let duration = started.elapsed();

    crate::log_performance!(
        codes::success::FILE_PROCESSING_SUCCESS,
        "File highlighted",
        duration = duration,
        "file" => path.display(),
        "language" => language.display_name(),
        "size_bytes" => source.size,
        "is_large_file" => source.is_large()
    );

    Ok(FileHighlights {
        path: source.path,
        source: source.text,
        result,
        duration_ms: duration.as_secs_f64() * 1000.0,
    })
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

/// Highlight `paths`, sequentially for one thread and in chunks otherwise
pub fn process_files(paths: &[PathBuf], config: &BatchConfig, rules: Arc<RuleSet>) -> BatchResults {
    let start_time = Instant::now();
    let threads = config.effective_threads();

    crate::log_info!("Starting batch processing",
        "files" => paths.len(),
        "threads" => threads
    );

    let mut results = if threads == 1 || paths.len() <= 1 {
        process_sequential(paths, config, &rules)
    } else {
        process_parallel(paths, config, &rules, threads)
    };

    results.files_discovered = paths.len();
    results.sort_by_path();
    results.processing_duration = start_time.elapsed();

    crate::log_success!(
        codes::success::BATCH_PROCESSING_COMPLETE,
        "Batch processing completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "diagnostics" => results.total_diagnostics(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    results
}

/// Process one file inside its logging context; false when the batch should stop
fn process_one(
    file_path: &Path,
    file_id: usize,
    config: &BatchConfig,
    rules: &RuleSet,
    results: &mut BatchResults,
) -> bool {
    logging::with_file_context(file_path.to_path_buf(), file_id, || {
        match highlight_file_with_preferences(
            file_path,
            config.language_override,
            rules,
            &config.highlight,
            config.lexical.clone(),
        ) {
            Ok(file) => {
                results.add_success(file);
                true
            }
            Err(error) => {
                crate::log_error!(
                    error.error_code(),
                    &error.to_string(),
                    "file" => file_path.display(),
                    "file_id" => file_id
                );
                results.add_failure(file_path.to_path_buf(), error);
                !config.fail_fast
            }
        }
    })
}

fn process_sequential(paths: &[PathBuf], config: &BatchConfig, rules: &RuleSet) -> BatchResults {
    let mut results = BatchResults::new();

    for (file_id, file_path) in paths.iter().enumerate() {
        if config.progress_reporting {
            eprintln!(
                "Processing file {} of {}: {}",
                file_id + 1,
                paths.len(),
                file_path.display()
            );
        }

        if !process_one(file_path, file_id, config, rules, &mut results) {
            crate::log_warning!(
                codes::system::INTERNAL_ERROR,
                "Fail-fast mode enabled, stopping batch processing"
            );
            break;
        }
    }

    results
}

fn process_parallel(
    paths: &[PathBuf],
    config: &BatchConfig,
    rules: &Arc<RuleSet>,
    threads: usize,
) -> BatchResults {
    let mut results = BatchResults::new();
    let chunk_size = calculate_chunk_size(paths.len(), threads);

    crate::log_debug!("Parallel processing configuration",
        "total_files" => paths.len(),
        "chunk_size" => chunk_size,
        "threads" => threads
    );

    let stop = Arc::new(AtomicBool::new(false));
    for (chunk_index, chunk) in paths.chunks(chunk_size).enumerate() {
        let first_id = chunk_index * chunk_size;
        results.merge(process_chunk_parallel(chunk, first_id, config, rules, threads, &stop));

        if stop.load(Ordering::SeqCst) {
            crate::log_warning!(
                codes::system::INTERNAL_ERROR,
                "Fail-fast mode enabled, stopping batch processing"
            );
            break;
        }
    }

    results
}

fn lock_results(results: &Mutex<BatchResults>) -> MutexGuard<'_, BatchResults> {
    results.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Workers check `stop` before each file and set it when a failure should end the batch
fn process_chunk_parallel(
    files: &[PathBuf],
    first_id: usize,
    config: &BatchConfig,
    rules: &Arc<RuleSet>,
    threads: usize,
    stop: &Arc<AtomicBool>,
) -> BatchResults {
    let results = Arc::new(Mutex::new(BatchResults::new()));
    let files_per_thread = files.len().div_ceil(threads);
    let mut workers = Vec::new();

    for (thread_index, thread_files) in files.chunks(files_per_thread).enumerate() {
        let thread_files = thread_files.to_vec();
        let start_id = first_id + thread_index * files_per_thread;
        let results = Arc::clone(&results);
        let rules = Arc::clone(rules);
        let stop = Arc::clone(stop);
        let config = config.clone();
        let assigned = thread_files.clone();

        let handle = thread::spawn(move || {
            for (offset, file_path) in thread_files.iter().enumerate() {
                if stop.load(Ordering::SeqCst) {
                    break;
                }
                let mut local = BatchResults::new();
                if !process_one(file_path, start_id + offset, &config, &rules, &mut local) {
                    stop.store(true, Ordering::SeqCst);
                }
                lock_results(&results).merge(local);
            }
        });
        workers.push((handle, assigned));
    }

    join_workers(workers, &results)
}

/// Join every worker, then take the shared results; files a panicked worker
/// never finished become `ThreadError` failures
fn join_workers(
    workers: Vec<(JoinHandle<()>, Vec<PathBuf>)>,
    shared: &Mutex<BatchResults>,
) -> BatchResults {
    let mut unfinished = Vec::new();
    for (handle, assigned) in workers {
        if handle.join().is_err() {
            unfinished.extend(assigned);
        }
    }

    let mut results = std::mem::take(&mut *lock_results(shared));
    if unfinished.is_empty() {
        return results;
    }

    let finished: HashSet<PathBuf> = results
        .successful_files
        .iter()
        .map(|file| file.path.clone())
        .chain(results.failed_files.iter().map(|(path, _)| path.clone()))
        .collect();

    for path in unfinished {
        if finished.contains(&path) {
            continue;
        }
        let error = BatchError::ThreadError {
            message: format!("Worker thread panicked before finishing {}", path.display()),
        };
        crate::log_error!(error.error_code(), &error.to_string(), "file" => path.display());
        results.add_failure(path, error);
    }
    results
}

fn calculate_chunk_size(file_count: usize, threads: usize) -> usize {
    const MAX_CHUNK_SIZE: usize = 50;

    let threads = threads.max(1);
    file_count.div_ceil(threads).clamp(1, MAX_CHUNK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    fn quiet_config(threads: usize) -> BatchConfig {
        BatchConfig {
            max_threads: threads,
            lexical: LexicalPreferences {
                log_diagnostics: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_file_discovery() {
        let temp_dir = tempdir().unwrap();
        let temp_path = temp_dir.path();

        fs::write(temp_path.join("main.c"), "int main(void) { return 0; }\n").unwrap();
        fs::write(temp_path.join("util.hpp"), "#pragma once\n").unwrap();
        fs::write(temp_path.join("notes.txt"), "not code").unwrap();
        fs::create_dir(temp_path.join("sub")).unwrap();
        fs::write(temp_path.join("sub").join("deep.cc"), "class A {};\n").unwrap();

        let files = discover_source_files(temp_path, &quiet_config(1)).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));

        let shallow = BatchConfig {
            recursive: false,
            ..quiet_config(1)
        };
        assert_eq!(discover_source_files(temp_path, &shallow).unwrap().len(), 2);
    }

    #[test]
    fn test_discovery_respects_max_files() {
        let temp_dir = tempdir().unwrap();
        for i in 0..5 {
            fs::write(temp_dir.path().join(format!("f{i}.c")), "x;").unwrap();
        }
        let config = BatchConfig {
            max_files: Some(2),
            ..quiet_config(1)
        };
        assert_eq!(discover_source_files(temp_dir.path(), &config).unwrap().len(), 2);
    }

    #[test]
    fn test_discovery_errors() {
        let temp_dir = tempdir().unwrap();
        assert_matches!(
            discover_source_files(temp_dir.path(), &quiet_config(1)),
            Err(BatchError::NoFilesFound { .. })
        );
        assert_matches!(
            discover_source_files(&temp_dir.path().join("missing"), &quiet_config(1)),
            Err(BatchError::DirectoryNotFound { .. })
        );
    }

    #[test]
    fn test_load_source() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("a.h");
        fs::write(&path, "#define A 1\n").unwrap();

        let source = load_source(&path).unwrap();
        assert_eq!(source.language, Some(Language::C));
        assert_eq!(source.size, 12);
        assert_eq!(source.line_count(), 2);
        assert!(!source.is_large());
    }

    #[test]
    fn test_load_source_rejects_invalid_utf8() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("bad.c");
        fs::write(&path, [b'a', b'b', 0xFF, b'c']).unwrap();

        let error = load_source(&path).unwrap_err();
        assert_matches!(error, BatchError::InvalidEncoding { offset: 2, .. });
        assert_eq!(error.error_code().as_str(), "E010");
    }

    #[test]
    fn test_load_source_missing_file() {
        let temp_dir = tempdir().unwrap();
        let error = load_source(&temp_dir.path().join("nope.c")).unwrap_err();
        assert_matches!(error, BatchError::FileNotFound { .. });
        assert_eq!(error.error_code().as_str(), "E005");
    }

    #[test]
    fn test_highlight_file_language_detection() {
        let temp_dir = tempdir().unwrap();
        let rules = RuleSet::new();
        let prefs = HighlightPreferences::default();

        let cpp = temp_dir.path().join("a.cpp");
        fs::write(&cpp, "class A {};\n").unwrap();
        let file = highlight_file(&cpp, None, &rules, &prefs).unwrap();
        assert_eq!(file.result.language, Language::Cpp);
        assert_eq!(file.source, "class A {};\n");

        let txt = temp_dir.path().join("a.txt");
        fs::write(&txt, "int x;").unwrap();
        assert_matches!(
            highlight_file(&txt, None, &rules, &prefs),
            Err(BatchError::UnknownLanguage { .. })
        );
        let forced = highlight_file(&txt, Some(Language::C), &rules, &prefs).unwrap();
        assert_eq!(forced.result.language, Language::C);
    }

    #[test]
    fn test_process_files_parallel_matches_sequential() {
        let temp_dir = tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..7 {
            let path = temp_dir.path().join(format!("f{i}.c"));
            fs::write(&path, format!("int v{i} = {i}; /* open")).unwrap();
            paths.push(path);
        }
        paths.push(temp_dir.path().join("missing.c"));

        let rules = Arc::new(RuleSet::new());
        let sequential = process_files(&paths, &quiet_config(1), Arc::clone(&rules));
        let parallel = process_files(&paths, &quiet_config(3), rules);

        for results in [&sequential, &parallel] {
            assert_eq!(results.files_processed, 8);
            assert_eq!(results.success_count(), 7);
            assert_eq!(results.failure_count(), 1);
            assert_eq!(results.total_diagnostics(), 7);
        }
        let seq_paths: Vec<&PathBuf> = sequential.successful_files.iter().map(|f| &f.path).collect();
        let par_paths: Vec<&PathBuf> = parallel.successful_files.iter().map(|f| &f.path).collect();
        assert_eq!(seq_paths, par_paths);
    }

    #[test]
    fn test_fail_fast_stops_sequential_run() {
        let temp_dir = tempdir().unwrap();
        let good = temp_dir.path().join("good.c");
        fs::write(&good, "x;").unwrap();
        let paths = vec![temp_dir.path().join("missing.c"), good];

        let config = BatchConfig {
            fail_fast: true,
            ..quiet_config(1)
        };
        let results = process_files(&paths, &config, Arc::new(RuleSet::new()));
        assert_eq!(results.files_processed, 1);
        assert_eq!(results.failure_count(), 1);
    }

    #[test]
    fn test_fail_fast_stops_parallel_workers() {
        let temp_dir = tempdir().unwrap();
        let mut paths = vec![temp_dir.path().join("a_missing.c")];
        for i in 0..20 {
            let path = temp_dir.path().join(format!("f{i:02}.c"));
            fs::write(&path, "x;").unwrap();
            paths.push(path);
        }

        let config = BatchConfig {
            fail_fast: true,
            ..quiet_config(2)
        };
        let results = process_files(&paths, &config, Arc::new(RuleSet::new()));
        // First chunk is 11 files split 6/5; the failing worker stops after one
        // file and the second chunk never starts
        assert_eq!(results.failure_count(), 1);
        assert!(results.files_processed <= 6, "{}", results.files_processed);
        assert_matches!(results.failed_files[0].1, BatchError::FileNotFound { .. });
    }

    #[test]
    fn test_join_workers_keeps_results_after_panic() {
        let shared = Mutex::new(BatchResults::new());
        lock_results(&shared).add_failure(
            PathBuf::from("a.c"),
            BatchError::FileNotFound {
                path: "a.c".to_string(),
            },
        );

        let panicked = thread::spawn(|| panic!("worker failed"));
        let finished = thread::spawn(|| {});
        let workers = vec![
            (panicked, vec![PathBuf::from("a.c"), PathBuf::from("b.c")]),
            (finished, vec![PathBuf::from("c.c")]),
        ];

        let results = join_workers(workers, &shared);
        assert_eq!(results.files_processed, 2);
        assert_matches!(results.failed_files[0].1, BatchError::FileNotFound { .. });
        assert_eq!(results.failed_files[1].0, PathBuf::from("b.c"));
        assert_matches!(results.failed_files[1].1, BatchError::ThreadError { .. });
        assert_eq!(results.failed_files[1].1.error_code().as_str(), "ERR001");
    }

    #[cfg(unix)]
    #[test]
    fn test_discovery_skips_symlinked_directories() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("main.c"), "int x;\n").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("a.h"), "#pragma once\n").unwrap();
        std::os::unix::fs::symlink(root, root.join("sub").join("loop")).unwrap();
        std::os::unix::fs::symlink(root.join("main.c"), root.join("alias.c")).unwrap();

        let files = discover_source_files(root, &quiet_config(1)).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("alias.c"),
                PathBuf::from("main.c"),
                PathBuf::from("sub").join("a.h"),
            ]
        );
    }

    #[test]
    fn test_collect_inputs() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.c"), "x;").unwrap();
        let explicit = temp_dir.path().join("explicit.txt");
        fs::write(&explicit, "x;").unwrap();

        let inputs = vec![temp_dir.path().to_path_buf(), explicit.clone()];
        let files = collect_inputs(&inputs, &quiet_config(1)).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1], explicit);
    }

    #[test]
    fn test_chunk_size_calculation() {
        assert_eq!(calculate_chunk_size(100, 4), 25);
        assert_eq!(calculate_chunk_size(10, 4), 3);
        assert_eq!(calculate_chunk_size(1, 4), 1);
        assert_eq!(calculate_chunk_size(200, 4), 50);
        assert_eq!(calculate_chunk_size(0, 0), 1);
    }

    #[test]
    fn test_batch_config_default() {
        let config = BatchConfig::default();
        assert!(config.effective_threads() >= 1);
        assert!(config.effective_threads() <= MAX_WORKER_THREADS);
        assert!(config.recursive);
        assert!(!config.fail_fast);
        assert!(config.max_files.is_none());
        assert!(config.language_override.is_none());
    }

    #[test]
    fn test_batch_results_summary() {
        let mut results = BatchResults::new();
        assert_eq!(results.success_rate(), 0.0);
        results.add_failure(
            PathBuf::from("x.c"),
            BatchError::FileNotFound {
                path: "x.c".to_string(),
            },
        );
        assert_eq!(results.failure_count(), 1);
        assert!(results.summary().contains("1 failed"));
    }
}
