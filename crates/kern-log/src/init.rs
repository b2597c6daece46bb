//! Process-level and thread-level logging setup.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use kern_status::{KResult, Status};
use parking_lot::Mutex;

use crate::logger::{set_thread_initialized, thread_initialized};
use crate::{ConsoleLogHandler, FileLogHandler, LogConfig, LogHandler, Logger};

static INITIALIZED: Mutex<bool> = parking_lot::const_mutex(false);

/// Console handler (when enabled) then file handler at
/// `<log_dir>/<file_stem>.log` (when a directory is set). Nothing is
/// attached anywhere yet, so a failure leaves no partial state.
fn build_handlers(file_stem: &str, config: &LogConfig) -> KResult<Vec<Arc<dyn LogHandler>>> {
    let mut handlers: Vec<Arc<dyn LogHandler>> = Vec::with_capacity(2);
    if config.console {
        let console = ConsoleLogHandler::new()
            .pattern(config.pattern.clone())
            .flush_each_write(config.flush);
        handlers.push(Arc::new(console));
    }
    if let Some(dir) = &config.log_dir {
        fs::create_dir_all(dir).map_err(Status::from)?;
        let file = FileLogHandler::open(dir.join(format!("{file_stem}.log")))?;
        handlers.push(Arc::new(file));
    }
    Ok(handlers)
}

fn attach(logger: &Logger, handlers: Vec<Arc<dyn LogHandler>>) -> Status {
    for handler in handlers {
        let status = logger.add_handler(handler);
        if !status.ok() {
            return status;
        }
    }
    Status::new()
}

// ── Default logger ────────────────────────────────────────────────

/// Attach a console handler and, when `log_dir` is given, a file handler
/// at `<log_dir>/<program_name>.log` to the default logger.
///
/// Idempotent: once initialized, later calls return OK and do nothing
/// until [`close_kern_logging`].
pub fn init_kern_logging(program_name: &str, log_dir: Option<&Path>) -> Status {
    let mut config = LogConfig::default();
    config.log_dir = log_dir.map(Path::to_path_buf);
    init_kern_logging_with(program_name, &config)
}

/// [`init_kern_logging`] with explicit options.
pub fn init_kern_logging_with(program_name: &str, config: &LogConfig) -> Status {
    let logger = Logger::get_default();
    let mut initialized = INITIALIZED.lock();
    if *initialized {
        return Status::new();
    }

    let handlers = match build_handlers(program_name, config) {
        Ok(h) => h,
        Err(status) => {
            tracing::warn!(program = program_name, %status, "logging init failed");
            return status;
        }
    };
    let status = attach(&logger, handlers);
    if !status.ok() {
        return status;
    }

    *initialized = true;
    tracing::debug!(program = program_name, dir = ?config.log_dir, "logging initialized");
    Status::new()
}

/// Close and detach every handler of the default logger. A later
/// [`init_kern_logging`] starts from scratch.
///
/// Handlers are detached under the init lock and closed after it is
/// released, so a handler's `close` may query or re-run initialization.
pub fn close_kern_logging() -> Status {
    let logger = Logger::get_default();
    let detached = {
        let mut initialized = INITIALIZED.lock();
        *initialized = false;
        logger.detach_handlers()
    };
    let status = match detached {
        Ok(handlers) => logger.close_detached(handlers),
        Err(status) => status,
    };
    tracing::debug!(%status, "logging closed");
    status
}

pub fn is_kern_logging_initialized() -> bool {
    *INITIALIZED.lock()
}

// ── Thread logger ─────────────────────────────────────────────────

/// Set up the calling thread's logger: console handler plus, when
/// `log_dir` is given, `<log_dir>/<logger name>.log`.
///
/// Idempotent per thread until [`close_thread_specific_kern_logging`] or
/// [`Logger::cleanup_thread_logger`].
pub fn init_thread_specific_kern_logging(log_dir: Option<&Path>) -> Status {
    let mut config = LogConfig::default();
    config.log_dir = log_dir.map(Path::to_path_buf);
    init_thread_specific_kern_logging_with(&config)
}

/// [`init_thread_specific_kern_logging`] with explicit options.
pub fn init_thread_specific_kern_logging_with(config: &LogConfig) -> Status {
    let logger = Logger::get_thread_logger(None);
    if thread_initialized() {
        return Status::new();
    }

    let handlers = match build_handlers(logger.name(), config) {
        Ok(h) => h,
        Err(status) => return status,
    };
    let status = attach(&logger, handlers);
    if !status.ok() {
        return status;
    }

    set_thread_initialized(true);
    tracing::debug!(logger = logger.name(), "thread logging initialized");
    Status::new()
}

/// Close and detach every handler of the calling thread's logger. The
/// logger itself stays registered.
pub fn close_thread_specific_kern_logging() -> Status {
    match Logger::current_thread_logger() {
        Some(logger) => {
            let status = logger.close_all_handlers();
            set_thread_initialized(false);
            status
        }
        None => Status::new(),
    }
}
