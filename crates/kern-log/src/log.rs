//! LOG / DLOG / TLOG / DTLOG entry points.
//!
//! | Family   | Logger          | Builds       | On failure                 |
//! |----------|-----------------|--------------|----------------------------|
//! | `log*`   | default         | all          | returns the `Status`       |
//! | `dlog*`  | default         | debug only   | prints and exits with 1    |
//! | `tlog*`  | calling thread  | all          | returns the `Status`       |
//! | `dtlog*` | calling thread  | debug only   | prints and exits with 1    |
//!
//! `*_fatal` variants log at `FATAL` and then exit with status 1.
//!
//! All functions are `#[track_caller]`, so `%F`/`%L` point at the code
//! that called them.
//!
//! # Usage
//!
//! ```ignore
//! use kern_log::{klog, log_info, tlog_warning};
//!
//! log_info("service started");
//! tlog_warning("queue almost full");
//! klog!(Error, "request {} failed: {}", id, status);
//! ```

use std::panic::Location;

use kern_core::check::check_failed;
use kern_status::Status;

use crate::{LogSeverity, Logger};

/// True in builds where `dlog*` / `dtlog*` emit.
pub const DLOG_ENABLED: bool = cfg!(debug_assertions);

#[cold]
fn dlog_failed(status: &Status, loc: &Location<'_>) -> ! {
    check_failed(loc.file(), loc.line(), format_args!("DLOG failed: {status}"))
}

fn exit_fatal() -> ! {
    std::process::exit(1)
}

// ── LOG ───────────────────────────────────────────────────────────

#[track_caller]
pub fn log(severity: LogSeverity, message: &str) -> Status {
    Logger::get_default().log(severity, message)
}

#[track_caller]
pub fn log_info(message: &str) -> Status {
    log(LogSeverity::Info, message)
}

#[track_caller]
pub fn log_warning(message: &str) -> Status {
    log(LogSeverity::Warning, message)
}

#[track_caller]
pub fn log_error(message: &str) -> Status {
    log(LogSeverity::Error, message)
}

/// Log at `FATAL`, then exit with status 1.
#[track_caller]
pub fn log_fatal(message: &str) -> ! {
    let _ = log(LogSeverity::Fatal, message);
    exit_fatal()
}

// ── DLOG ──────────────────────────────────────────────────────────

/// Debug builds only. Exits with status 1 if logging fails.
#[track_caller]
pub fn dlog(severity: LogSeverity, message: &str) {
    if DLOG_ENABLED {
        let status = log(severity, message);
        if !status.ok() {
            dlog_failed(&status, Location::caller());
        }
    }
}

#[track_caller]
pub fn dlog_info(message: &str) {
    dlog(LogSeverity::Info, message)
}

#[track_caller]
pub fn dlog_warning(message: &str) {
    dlog(LogSeverity::Warning, message)
}

#[track_caller]
pub fn dlog_error(message: &str) {
    dlog(LogSeverity::Error, message)
}

/// Debug builds only: log at `FATAL`, then exit with status 1.
#[track_caller]
pub fn dlog_fatal(message: &str) {
    if DLOG_ENABLED {
        dlog(LogSeverity::Fatal, message);
        exit_fatal();
    }
}

// ── TLOG ──────────────────────────────────────────────────────────

#[track_caller]
pub fn tlog(severity: LogSeverity, message: &str) -> Status {
    Logger::get_thread_logger(None).log(severity, message)
}

#[track_caller]
pub fn tlog_info(message: &str) -> Status {
    tlog(LogSeverity::Info, message)
}

#[track_caller]
pub fn tlog_warning(message: &str) -> Status {
    tlog(LogSeverity::Warning, message)
}

#[track_caller]
pub fn tlog_error(message: &str) -> Status {
    tlog(LogSeverity::Error, message)
}

/// Log at `FATAL` on the thread logger, then exit with status 1.
#[track_caller]
pub fn tlog_fatal(message: &str) -> ! {
    let _ = tlog(LogSeverity::Fatal, message);
    exit_fatal()
}

// ── DTLOG ─────────────────────────────────────────────────────────

/// Debug builds only. Exits with status 1 if logging fails.
#[track_caller]
pub fn dtlog(severity: LogSeverity, message: &str) {
    if DLOG_ENABLED {
        let status = tlog(severity, message);
        if !status.ok() {
            dlog_failed(&status, Location::caller());
        }
    }
}

#[track_caller]
pub fn dtlog_info(message: &str) {
    dtlog(LogSeverity::Info, message)
}

#[track_caller]
pub fn dtlog_warning(message: &str) {
    dtlog(LogSeverity::Warning, message)
}

#[track_caller]
pub fn dtlog_error(message: &str) {
    dtlog(LogSeverity::Error, message)
}

#[track_caller]
pub fn dtlog_fatal(message: &str) {
    if DLOG_ENABLED {
        dtlog(LogSeverity::Fatal, message);
        exit_fatal();
    }
}

// ── Macros ────────────────────────────────────────────────────────

/// Formatted LOG on the default logger: `klog!(Warning, "x = {}", x)`.
/// Evaluates to the `Status`.
#[macro_export]
macro_rules! klog {
    ($sev:ident, $($arg:tt)+) => {
        $crate::log($crate::LogSeverity::$sev, &::std::format!($($arg)+))
    };
}

/// Formatted TLOG on the calling thread's logger.
#[macro_export]
macro_rules! ktlog {
    ($sev:ident, $($arg:tt)+) => {
        $crate::tlog($crate::LogSeverity::$sev, &::std::format!($($arg)+))
    };
}
