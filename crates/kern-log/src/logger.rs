//! The [`Logger`]: a named, ordered set of handlers.
//!
//! # Dispatch
//!
//! `log()` takes the logger's lock only long enough to snapshot the handler
//! list, then calls each handler with no logger lock held. Logger and
//! handler locks therefore never nest, and a handler may itself log.
//!
//! # Instances
//!
//! - [`Logger::get_default`]: one process-wide logger named `"default"`.
//! - [`Logger::get_thread_logger`]: one logger per OS thread, kept in
//!   thread-local storage and listed in the [`LoggerRegistry`] until
//!   [`Logger::cleanup_thread_logger`] runs or the thread exits.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe, Location};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use kern_core::Guarded;
use kern_status::{KResult, Status, StatusCode};
use parking_lot::Mutex;

use crate::{LogHandler, LogRecord, LogSeverity};

pub(crate) type HandlerList = Vec<Arc<dyn LogHandler>>;

fn same_handler(a: &Arc<dyn LogHandler>, b: &Arc<dyn LogHandler>) -> bool {
    // Compare data pointers only; vtable pointers may differ per codegen unit.
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

pub struct Logger {
    name: String,
    handlers: Guarded<HandlerList>,
}

impl Logger {
    /// A standalone logger. It is not listed in the registry.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), handlers: Guarded::new(Vec::new()) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append `handler` unless this exact handler is already present.
    pub fn add_handler(&self, handler: Arc<dyn LogHandler>) -> Status {
        let mut list = match self.handlers.lock() {
            Ok(l) => l,
            Err(status) => return status,
        };
        if !list.iter().any(|h| same_handler(h, &handler)) {
            list.push(handler);
        }
        Status::new()
    }

    /// Remove `handler` if present.
    pub fn remove_handler(&self, handler: &Arc<dyn LogHandler>) -> Status {
        let mut list = match self.handlers.lock() {
            Ok(l) => l,
            Err(status) => return status,
        };
        list.retain(|h| !same_handler(h, handler));
        Status::new()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().map_or(0, |l| l.len())
    }

    /// Detach every handler and close each one.
    ///
    /// All handlers are closed even if some fail; the first failure is
    /// returned. The logger accepts new handlers afterwards.
    pub fn close_all_handlers(&self) -> Status {
        match self.detach_handlers() {
            Ok(detached) => self.close_detached(detached),
            Err(status) => status,
        }
    }

    /// Empty the handler list without closing anything.
    pub(crate) fn detach_handlers(&self) -> KResult<HandlerList> {
        let mut list = self.handlers.lock()?;
        Ok(std::mem::take(&mut *list))
    }

    /// Close handlers previously taken by `detach_handlers`.
    pub(crate) fn close_detached(&self, detached: HandlerList) -> Status {
        let mut first_err = Status::new();
        for handler in detached {
            let status = handler.close();
            if !status.ok() {
                tracing::warn!(logger = %self.name, %status, "handler close failed");
                if first_err.ok() {
                    first_err = status;
                }
            }
        }
        first_err
    }

    /// Send `message` to every handler in order. The call site is recorded
    /// for the `%F`/`%L` placeholders.
    ///
    /// Returns `NOT_FOUND` when no handler is attached, otherwise the first
    /// non-OK handler status (later handlers are skipped).
    #[track_caller]
    pub fn log(&self, severity: LogSeverity, message: &str) -> Status {
        let record = LogRecord::new(severity, message).with_location(Location::caller());
        self.log_record(&record)
    }

    /// Dispatch a prepared record.
    pub fn log_record(&self, record: &LogRecord<'_>) -> Status {
        let snapshot: HandlerList = match self.handlers.lock() {
            Ok(l) if l.is_empty() => {
                return Status::with_code(StatusCode::NotFound, "No handlers configured")
            }
            Ok(l) => l.clone(),
            Err(status) => return status,
        };

        for handler in &snapshot {
            let status = catch_unwind(AssertUnwindSafe(|| handler.handle(record)))
                .unwrap_or_else(|payload| Status::from_panic(&*payload));
            if !status.ok() {
                tracing::debug!(logger = %self.name, %status, "handler failed");
                return status;
            }
        }
        Status::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("handlers", &self.handler_count())
            .finish()
    }
}

// ── Default instance ──────────────────────────────────────────────

const DEFAULT_NAME: &str = "default";

static DEFAULT_LOGGER: OnceLock<Arc<Logger>> = OnceLock::new();

impl Logger {
    /// The process-wide logger, created on first use.
    pub fn get_default() -> Arc<Logger> {
        Arc::clone(DEFAULT_LOGGER.get_or_init(|| {
            let logger = Arc::new(Logger::new(DEFAULT_NAME));
            LoggerRegistry::global().register_default(&logger);
            logger
        }))
    }
}

// ── Registry ──────────────────────────────────────────────────────

/// Names of the live registered loggers.
///
/// Names are unique: a requested name that is already taken gets a
/// `_<n>` suffix.
pub struct LoggerRegistry {
    entries: Mutex<BTreeMap<String, Weak<Logger>>>,
}

static REGISTRY: LoggerRegistry = LoggerRegistry { entries: parking_lot::const_mutex(BTreeMap::new()) };

impl LoggerRegistry {
    pub fn global() -> &'static LoggerRegistry {
        &REGISTRY
    }

    pub fn registered_names(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().contains_key(name)
    }

    /// The live logger registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.entries.lock().get(name).and_then(Weak::upgrade)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn register_default(&self, logger: &Arc<Logger>) {
        self.entries.lock().insert(logger.name.clone(), Arc::downgrade(logger));
    }

    /// Register a logger under the first free name among `base`,
    /// `base_2`, `base_3`, ... The default logger's name is never handed
    /// out, even before the default logger exists.
    ///
    /// `handlers` is built by the caller so no factory code runs under the
    /// registry lock.
    fn reserve(&self, base: &str, handlers: Guarded<HandlerList>) -> Arc<Logger> {
        let mut entries = self.entries.lock();
        let taken = |name: &str| name == DEFAULT_NAME || entries.contains_key(name);
        let mut name = base.to_string();
        let mut n = 1u32;
        while taken(&name) {
            n += 1;
            name = format!("{base}_{n}");
        }
        let logger = Arc::new(Logger { name: name.clone(), handlers });
        entries.insert(name, Arc::downgrade(&logger));
        logger
    }

    /// Remove `logger`'s entry if it still belongs to `logger`.
    fn deregister(&self, logger: &Arc<Logger>) {
        let mut entries = self.entries.lock();
        let owned = entries
            .get(&logger.name)
            .is_some_and(|w| std::ptr::eq(w.as_ptr(), Arc::as_ptr(logger)));
        if owned {
            entries.remove(&logger.name);
        }
    }
}

// ── Thread loggers ────────────────────────────────────────────────

static UNNAMED_THREADS: AtomicU64 = AtomicU64::new(0);

struct ThreadSlot {
    logger: Arc<Logger>,
    /// Set by `init_thread_specific_kern_logging`.
    initialized: bool,
}

impl Drop for ThreadSlot {
    fn drop(&mut self) {
        REGISTRY.deregister(&self.logger);
    }
}

thread_local! {
    static THREAD_LOGGER: RefCell<Option<ThreadSlot>> = const { RefCell::new(None) };
}

fn derived_name() -> String {
    match std::thread::current().name() {
        Some(n) => format!("thread_{n}"),
        None => format!("thread_{}", UNNAMED_THREADS.fetch_add(1, Ordering::Relaxed) + 1),
    }
}

impl Logger {
    /// The calling thread's logger, created on first call.
    ///
    /// `name` is only used on creation; it defaults to
    /// `thread_<thread name>`, or `thread_<n>` for unnamed threads.
    pub fn get_thread_logger(name: Option<&str>) -> Arc<Logger> {
        if let Some(logger) = Self::current_thread_logger() {
            return logger;
        }

        // The mutex factory may run arbitrary code; keep it outside the
        // slot borrow and the registry lock.
        let handlers = Guarded::new(Vec::new());
        let base = name.map_or_else(derived_name, str::to_string);
        let logger = REGISTRY.reserve(&base, handlers);

        let installed = THREAD_LOGGER.with(|slot| {
            let mut slot = slot.borrow_mut();
            match slot.as_ref() {
                // Created meanwhile from inside the factory.
                Some(s) => Err(Arc::clone(&s.logger)),
                None => {
                    *slot = Some(ThreadSlot { logger: Arc::clone(&logger), initialized: false });
                    Ok(())
                }
            }
        });
        match installed {
            Ok(()) => {
                tracing::debug!(logger = %logger.name, "thread logger created");
                logger
            }
            Err(existing) => {
                REGISTRY.deregister(&logger);
                existing
            }
        }
    }

    /// Drop the calling thread's logger and its registry entry. No-op when
    /// the thread has none.
    pub fn cleanup_thread_logger() {
        let slot = THREAD_LOGGER.with(|slot| slot.borrow_mut().take());
        if let Some(s) = slot {
            tracing::debug!(logger = %s.logger.name, "thread logger cleaned up");
            drop(s);
        }
    }

    /// The calling thread's logger, if one exists.
    pub fn current_thread_logger() -> Option<Arc<Logger>> {
        THREAD_LOGGER.with(|slot| slot.borrow().as_ref().map(|s| Arc::clone(&s.logger)))
    }
}

pub(crate) fn thread_initialized() -> bool {
    THREAD_LOGGER.with(|slot| slot.borrow().as_ref().is_some_and(|s| s.initialized))
}

pub(crate) fn set_thread_initialized(value: bool) {
    THREAD_LOGGER.with(|slot| {
        if let Some(s) = slot.borrow_mut().as_mut() {
            s.initialized = value;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    struct Counting {
        calls: AtomicUsize,
        closes: AtomicUsize,
        result: StatusCode,
    }

    impl Counting {
        fn new(result: StatusCode) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), closes: AtomicUsize::new(0), result })
        }
    }

    impl LogHandler for Counting {
        fn handle(&self, _record: &LogRecord<'_>) -> Status {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Status::from_code(self.result)
        }

        fn close(&self) -> Status {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Status::from_code(self.result)
        }
    }

    struct Panicky;

    impl LogHandler for Panicky {
        fn handle(&self, _record: &LogRecord<'_>) -> Status {
            panic!("handler exploded");
        }
    }

    #[test]
    fn empty_logger_is_not_found() {
        let l = Logger::new("t");
        let s = l.log(LogSeverity::Info, "x");
        assert_eq!(s.code(), StatusCode::NotFound);
        assert_eq!(s.message(), Some("No handlers configured"));
    }

    #[test]
    fn add_is_idempotent_by_identity() {
        let l = Logger::new("t");
        let h: Arc<dyn LogHandler> = Counting::new(StatusCode::Ok);
        assert!(l.add_handler(Arc::clone(&h)).ok());
        assert!(l.add_handler(Arc::clone(&h)).ok());
        assert_eq!(l.handler_count(), 1);
        // A different instance is a different handler.
        assert!(l.add_handler(Counting::new(StatusCode::Ok)).ok());
        assert_eq!(l.handler_count(), 2);
    }

    #[test]
    fn remove_absent_is_noop() {
        let l = Logger::new("t");
        let h: Arc<dyn LogHandler> = Counting::new(StatusCode::Ok);
        assert!(l.remove_handler(&h).ok());
        l.add_handler(Arc::clone(&h));
        assert!(l.remove_handler(&h).ok());
        assert_eq!(l.handler_count(), 0);
    }

    #[test]
    fn first_failure_short_circuits() {
        let l = Logger::new("t");
        let a = Counting::new(StatusCode::Ok);
        let b = Counting::new(StatusCode::Internal);
        let c = Counting::new(StatusCode::Ok);
        l.add_handler(a.clone());
        l.add_handler(b.clone());
        l.add_handler(c.clone());

        assert_eq!(l.log(LogSeverity::Error, "x").code(), StatusCode::Internal);
        assert_eq!(a.calls.load(Ordering::SeqCst), 1);
        assert_eq!(b.calls.load(Ordering::SeqCst), 1);
        assert_eq!(c.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn handler_panic_becomes_status() {
        let l = Logger::new("t");
        l.add_handler(Arc::new(Panicky));
        let s = l.log(LogSeverity::Info, "x");
        assert_eq!(s.code(), StatusCode::Panic);
        assert_eq!(s.message(), Some("handler exploded"));
    }

    #[test]
    fn close_all_closes_each_once_and_reports_first_failure() {
        let l = Logger::new("t");
        let ok = Counting::new(StatusCode::Ok);
        let bad = Counting::new(StatusCode::DataLoss);
        let ok_dyn: Arc<dyn LogHandler> = ok.clone();
        l.add_handler(Arc::clone(&ok_dyn));
        l.add_handler(ok_dyn);
        l.add_handler(bad.clone());

        assert_eq!(l.close_all_handlers().code(), StatusCode::DataLoss);
        assert_eq!(ok.closes.load(Ordering::SeqCst), 1);
        assert_eq!(bad.closes.load(Ordering::SeqCst), 1);
        assert_eq!(l.handler_count(), 0);

        assert!(l.add_handler(Counting::new(StatusCode::Ok)).ok());
        assert!(l.log(LogSeverity::Info, "again").ok());
    }

    #[test]
    fn default_is_singleton_and_registered() {
        let a = Logger::get_default();
        let b = Logger::get_default();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.name(), "default");
        assert!(LoggerRegistry::global().contains("default"));
    }

    #[test]
    fn thread_logger_is_per_thread() {
        let main_logger = Logger::get_thread_logger(None);
        let again = Logger::get_thread_logger(Some("ignored"));
        assert!(Arc::ptr_eq(&main_logger, &again));

        let other = thread::spawn(|| Logger::get_thread_logger(None))
            .join()
            .unwrap();
        assert!(!Arc::ptr_eq(&main_logger, &other));
        assert_ne!(main_logger.name(), other.name());
        Logger::cleanup_thread_logger();
    }

    #[test]
    fn explicit_name_and_collision_suffix() {
        let first = thread::spawn(|| {
            let l = Logger::get_thread_logger(Some("worker_logger_test"));
            let name = l.name().to_string();
            let second = thread::spawn(|| Logger::get_thread_logger(Some("worker_logger_test")).name().to_string())
                .join()
                .unwrap();
            (name, second)
        })
        .join()
        .unwrap();
        assert_eq!(first.0, "worker_logger_test");
        assert_eq!(first.1, "worker_logger_test_2");
    }

    #[test]
    fn thread_logger_cannot_take_default_name() {
        let (name, still_listed) = thread::spawn(|| {
            let l = Logger::get_thread_logger(Some("default"));
            let d = Logger::get_default();
            let registered = LoggerRegistry::global().get(l.name());
            (l.name().to_string(), registered.is_some_and(|r| Arc::ptr_eq(&r, &l) && !Arc::ptr_eq(&r, &d)))
        })
        .join()
        .unwrap();
        assert_ne!(name, "default");
        assert!(name.starts_with("default_"));
        assert!(still_listed);

        let d = Logger::get_default();
        let registered = LoggerRegistry::global().get("default").unwrap();
        assert!(Arc::ptr_eq(&registered, &d));
    }

    #[test]
    fn cleanup_and_thread_exit_deregister() {
        let name = thread::spawn(|| {
            let l = Logger::get_thread_logger(Some("cleanup_target"));
            assert!(LoggerRegistry::global().contains("cleanup_target"));
            Logger::cleanup_thread_logger();
            assert!(!LoggerRegistry::global().contains("cleanup_target"));
            assert!(Logger::current_thread_logger().is_none());
            // Second cleanup is a no-op.
            Logger::cleanup_thread_logger();
            l.name().to_string()
        })
        .join()
        .unwrap();
        assert_eq!(name, "cleanup_target");

        thread::Builder::new()
            .name("exit_target".into())
            .spawn(|| {
                Logger::get_thread_logger(None);
                assert!(LoggerRegistry::global().contains("thread_exit_target"));
            })
            .unwrap()
            .join()
            .unwrap();
        assert!(!LoggerRegistry::global().contains("thread_exit_target"));
    }
}
