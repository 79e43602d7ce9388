//! Runtime configuration for the kiln command runner.
//!
//! [`Config`] is layered by `ortho_config`: built-in defaults, then a TOML
//! file named by `--config-path` or `KILN_CONFIG_PATH`, then `KILN_*`
//! environment variables, then command-line flags.
//!
//! The switches are optional so that a layer which does not mention them
//! leaves the value from the layer below untouched.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_ERROR_EXIT_CODE, DEFAULT_LOG_FILTER, default_error_exit_code, default_log_filter,
    default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Settings shared by every invocation of the runner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "KILN")]
pub struct Config {
    /// `tracing` filter expression applied to diagnostics on stderr.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Output format for diagnostics.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
    /// Print the offending command's help after a usage error.
    #[serde(default)]
    pub help_on_error: Option<bool>,
    /// Exit status for usage errors. Zero reports the error without failing.
    #[serde(default = "defaults::default_error_exit_code")]
    pub error_exit_code: u8,
    /// Show the call a command line would make instead of running it.
    #[serde(default)]
    pub preview: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            help_on_error: None,
            error_exit_code: DEFAULT_ERROR_EXIT_CODE,
            preview: None,
        }
    }
}

impl Config {
    /// Filter expression for the tracing subscriber.
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Format used by the tracing subscriber.
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Whether usage errors are followed by help text.
    pub fn help_on_error(&self) -> bool {
        self.help_on_error.unwrap_or(false)
    }

    /// Exit status for usage errors, or `None` when they should not fail
    /// the process.
    pub fn error_exit_code(&self) -> Option<u8> {
        (self.error_exit_code != 0).then_some(self.error_exit_code)
    }

    /// Whether command lines are previewed rather than run.
    pub fn preview(&self) -> bool {
        self.preview.unwrap_or(false)
    }
}
