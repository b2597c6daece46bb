//! Logging configuration.
//!
//! # Environment Variables
//!
//! - `KERN_LOG_DIR=<path>` - Directory for the log file (no file when unset)
//! - `KERN_LOG_PATTERN=<pattern>` - Console prefix pattern
//! - `KERN_LOG_FLUSH=0|1` - Flush the console after every record (default 1)
//! - `KERN_LOG_CONSOLE=0|1` - Attach the console handler (default 1)

use std::path::{Path, PathBuf};

use kern_core::env::{env_get_bool, env_get_path, env_get_str};

use crate::formatter::DEFAULT_PATTERN;

/// Options for the `init_*` entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Directory for `<name>.log`; created if missing. `None`: console only.
    pub log_dir: Option<PathBuf>,

    /// Console prefix pattern. Default: [`DEFAULT_PATTERN`].
    pub pattern: String,

    /// Attach a console handler. Default: true.
    pub console: bool,

    /// Flush the console after each record. Default: true.
    pub flush: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            pattern: DEFAULT_PATTERN.to_string(),
            console: true,
            flush: true,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `KERN_LOG_*` variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_dir: env_get_path("KERN_LOG_DIR"),
            pattern: env_get_str("KERN_LOG_PATTERN", &defaults.pattern),
            console: env_get_bool("KERN_LOG_CONSOLE", defaults.console),
            flush: env_get_bool("KERN_LOG_FLUSH", defaults.flush),
        }
    }

    pub fn log_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.log_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    pub fn flush(mut self, enabled: bool) -> Self {
        self.flush = enabled;
        self
    }
}
