//! # kern-log
//!
//! Severity-leveled logging with pluggable handlers.
//!
//! A [`Logger`] owns an ordered list of [`LogHandler`]s. Logging snapshots
//! the list under the logger's lock and calls each handler outside it, so
//! any number of threads can log while handlers are being added, removed
//! or closed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kern_log::{init_kern_logging, log_info, klog, LogSeverity};
//!
//! let status = init_kern_logging("server", Some(std::path::Path::new("/tmp/logs")));
//! assert!(status.ok());
//!
//! log_info("listening");
//! klog!(Warning, "{} connections pending", 12);
//! ```
//!
//! ## Modules
//!
//! - `severity` - `LogSeverity`
//! - `record` - `LogRecord`, one event with its call site and timestamp
//! - `formatter` - `LogFormatter` and the prefix placeholders
//! - `handler` - `LogHandler`, `ConsoleLogHandler`, `FileLogHandler`
//! - `logger` - `Logger`, default and per-thread instances, `LoggerRegistry`
//! - `config` - `LogConfig` and `KERN_LOG_*` environment variables
//! - `init` - `init_*` / `close_*` entry points
//! - `log` - LOG / DLOG / TLOG / DTLOG functions and the `klog!` macros
//!
//! Internal events (handler failures, file open/close) are emitted through
//! `tracing`; install a subscriber to see them.

pub mod config;
pub mod formatter;
pub mod handler;
pub mod init;
pub mod log;
pub mod logger;
pub mod record;
pub mod severity;

// Re-exports for convenience
pub use config::LogConfig;
pub use formatter::{LogFormatter, DEFAULT_PATTERN};
pub use handler::{ConsoleLogHandler, FileLogHandler, LogHandler};
pub use init::{
    close_kern_logging, close_thread_specific_kern_logging, init_kern_logging,
    init_kern_logging_with, init_thread_specific_kern_logging,
    init_thread_specific_kern_logging_with, is_kern_logging_initialized,
};
pub use crate::log::{
    dlog, dlog_error, dlog_fatal, dlog_info, dlog_warning, dtlog, dtlog_error, dtlog_fatal,
    dtlog_info, dtlog_warning, log, log_error, log_fatal, log_info, log_warning, tlog, tlog_error,
    tlog_fatal, tlog_info, tlog_warning, DLOG_ENABLED,
};
pub use logger::{Logger, LoggerRegistry};
pub use record::LogRecord;
pub use severity::LogSeverity;
