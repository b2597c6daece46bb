//! # kern - status, locking and logging kernel
//!
//! One dependency for the three kern crates:
//!
//! - [`kern_status`]: `Status` / `StatusOr<T>` outcomes and fault classification
//! - [`kern_core`]: `check!` / `dcheck!`, the `Mutex` capability and `MutexFactory`
//! - [`kern_log`]: `Logger`, handlers and the LOG / DLOG / TLOG / DTLOG entry points
//!
//! ## Quick Start
//!
//! ```no_run
//! use kern::{init_kern_logging_with, klog, log_info, LogConfig, Status, StatusOr};
//!
//! fn ratio(a: i64, b: i64) -> StatusOr<i64> {
//!     if b == 0 {
//!         return Status::zero_division_error("b is zero").into();
//!     }
//!     StatusOr::new(a / b)
//! }
//!
//! let status = init_kern_logging_with("app", &LogConfig::from_env());
//! assert!(status.ok());
//!
//! log_info("starting");
//! let r = ratio(10, 0);
//! klog!(Warning, "ratio failed: {}", r.status());
//! ```
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       kern-log                              │
//! │     Logger, handlers, formatter, init_*, log/dlog/tlog      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       kern-core                             │
//! │      Mutex trait, MutexFactory, Guarded<T>, check macros    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      kern-status                            │
//! │        StatusCode, Status, StatusOr<T>, fault table         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub use kern_core;
pub use kern_log;
pub use kern_status;

// Re-export status types
pub use kern_status::{
    catch_status,
    catch_status_or,
    format_fault_trace,
    get_status_code_for_fault,
    panic_message,
    KResult,
    Status,
    StatusCode,
    StatusOr,
};

// Re-export check macros
pub use kern_core::{check, dcheck, dcheck_eq, dcheck_gt, dcheck_in_enum, dcheck_ne, dcheck_some};
pub use kern_core::DCHECK_ENABLED;

// Re-export locking
pub use kern_core::{Guarded, GuardedRef, Mutex, MutexCtor, MutexFactory, ReentrantMutex, ScopedLock};

// Re-export env utilities
pub use kern_core::{env_get_bool, env_get_path, env_get_str};

// Re-export logging
pub use kern_log::{klog, ktlog};
pub use kern_log::{
    close_kern_logging, close_thread_specific_kern_logging, init_kern_logging,
    init_kern_logging_with, init_thread_specific_kern_logging,
    init_thread_specific_kern_logging_with, is_kern_logging_initialized,
};
pub use kern_log::{
    dlog, dlog_error, dlog_fatal, dlog_info, dlog_warning, dtlog, dtlog_error, dtlog_fatal,
    dtlog_info, dtlog_warning, log, log_error, log_fatal, log_info, log_warning, tlog, tlog_error,
    tlog_fatal, tlog_info, tlog_warning, DLOG_ENABLED,
};
pub use kern_log::{
    ConsoleLogHandler, FileLogHandler, LogConfig, LogFormatter, LogHandler, LogRecord,
    LogSeverity, Logger, LoggerRegistry, DEFAULT_PATTERN,
};
