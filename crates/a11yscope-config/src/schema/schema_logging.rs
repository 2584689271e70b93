//! Logging and output configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines on stderr instead of human-readable text.
    #[serde(default)]
    pub json: bool,

    /// Directory for daily rolling log files. No file output when unset.
    #[serde(default)]
    pub directory: Option<String>,

    /// Number of rotated log files kept.
    #[serde(default = "default_max_log_files")]
    pub max_log_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            directory: None,
            max_log_files: default_max_log_files(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    7
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}
