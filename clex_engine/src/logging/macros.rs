//! Logging macros taking a `Code` plus `"key" => value` context pairs.
//! Context values may be any `Display` type.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_context {
    ($($key:expr => $value:expr),*) => {
        vec![$(($key, format!("{}", $value))),*]
    };
}

/// Log an error event
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, None, vec![])
    };

    ($code:expr, $message:expr, span = $span:expr) => {
        $crate::logging::log_error_with_context($code, $message, Some($span), vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {{
        let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        let context_refs: Vec<(&str, &str)> =
            context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
        $crate::logging::log_error_with_context($code, $message, None, context_refs)
    }};

    ($code:expr, $message:expr, span = $span:expr, $($key:expr => $value:expr),+) => {{
        let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        let context_refs: Vec<(&str, &str)> =
            context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
        $crate::logging::log_error_with_context($code, $message, Some($span), context_refs)
    }};
}

/// Log a coded warning event
#[macro_export]
macro_rules! log_warning {
    ($code:expr, $message:expr) => {
        $crate::logging::log_warning_with_context($code, $message, None, vec![])
    };

    ($code:expr, $message:expr, span = $span:expr) => {
        $crate::logging::log_warning_with_context($code, $message, Some($span), vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {{
        let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        let context_refs: Vec<(&str, &str)> =
            context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
        $crate::logging::log_warning_with_context($code, $message, None, context_refs)
    }};

    ($code:expr, $message:expr, span = $span:expr, $($key:expr => $value:expr),+) => {{
        let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        let context_refs: Vec<(&str, &str)> =
            context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
        $crate::logging::log_warning_with_context($code, $message, Some($span), context_refs)
    }};
}

/// Log a success event
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {{
        let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        let context_refs: Vec<(&str, &str)> =
            context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
        $crate::logging::log_success_with_context($code, $message, context_refs)
    }};
}

/// Log an informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_info_with_context($message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+) => {{
        let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        let context_refs: Vec<(&str, &str)> =
            context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
        $crate::logging::log_info_with_context($message, context_refs)
    }};
}

/// Log a debug message; context is only formatted when debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            $crate::logging::log_debug_with_context($message, vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
            let context_refs: Vec<(&str, &str)> =
                context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
            $crate::logging::log_debug_with_context($message, context_refs)
        }
    };
}

/// Log a success event with a `duration_ms` entry
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr) => {
        $crate::log_success!($code, $message,
            "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0)
        )
    };

    ($code:expr, $message:expr, duration = $duration:expr, $($key:expr => $value:expr),+) => {
        $crate::log_success!($code, $message,
            "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0),
            $($key => $value),+
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;
    use crate::utils::{Position, SourceSpan};

    #[test]
    fn test_macros_accept_display_values() {
        // Uninitialized global logging turns every call into a no-op
        let file_size: u64 = 1024;
        let duration = std::time::Duration::from_millis(150);
        let span = SourceSpan::new(Position::start(), Position::new(1, 1, 2));

        log_error!(codes::lexical::LEXER_EXHAUSTED, "Exhausted",
            "offset" => file_size
        );
        log_warning!(codes::lexical::INVALID_CHARACTER, "Stray '@'",
            span = span,
            "char" => '@'
        );
        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => 157
        );
        log_info!("Highlighting file", "is_large" => file_size > 1000);
        log_debug!("Scanner state", "offset" => 12);
        log_performance!(codes::success::HIGHLIGHTING_COMPLETE, "Highlighted",
            duration = duration,
            "spans" => 3
        );
    }
}
