//! Configuration module for the clex engine
//! Compile-time limits come from the TOML profile processed by build.rs

// Generated at compile time from config/<profile>.toml
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{
    ConfigError, HighlightPreferences, LexicalPreferences, LoggingPreferences, RuntimeConfig,
};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("CLEX_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("CLEX_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time::*;
    use super::*;

    #[test]
    fn test_generated_limits_are_sane() {
        assert!(lexical::MAX_DIAGNOSTICS > 0);
        assert!(lexical::MAX_RAW_STRING_DELIMITER_LENGTH <= 16);
        assert!(file_processing::LARGE_FILE_THRESHOLD <= file_processing::MAX_FILE_SIZE);
        assert!(batch_processing::MAX_WORKER_THREADS >= 1);
        assert!(logging::MAX_LOG_EVENTS_PER_FILE <= logging::LOG_BUFFER_SIZE);
    }

    #[test]
    fn test_build_info() {
        assert!(build_info::source_info().ends_with(".toml"));
        assert!(!build_info::profile().is_empty());
    }
}
