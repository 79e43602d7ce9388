use crate::logging::LogFormat;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Exit status used when a command line cannot be dispatched.
pub const DEFAULT_ERROR_EXIT_CODE: u8 = 1;

/// Default log filter expression used by the binary.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default exit status for dispatch errors.
pub fn default_error_exit_code() -> u8 {
    DEFAULT_ERROR_EXIT_CODE
}
