//! Concurrent logging while the handler set changes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use kern_log::{LogHandler, LogRecord, LogSeverity, Logger};
use kern_status::Status;

#[derive(Default)]
struct Counter {
    seen: AtomicUsize,
}

impl LogHandler for Counter {
    fn handle(&self, record: &LogRecord<'_>) -> Status {
        assert!(record.message().starts_with("msg "));
        self.seen.fetch_add(1, Ordering::Relaxed);
        Status::new()
    }
}

/// Logs through the same logger from inside `handle`.
struct Echo {
    logger: Arc<Logger>,
    depth: AtomicUsize,
}

impl LogHandler for Echo {
    fn handle(&self, record: &LogRecord<'_>) -> Status {
        if self.depth.fetch_add(1, Ordering::SeqCst) == 0 {
            let inner = self.logger.log(record.severity(), "msg nested");
            self.depth.fetch_sub(1, Ordering::SeqCst);
            return inner;
        }
        self.depth.fetch_sub(1, Ordering::SeqCst);
        Status::new()
    }
}

#[test]
fn no_lost_messages_while_handlers_churn() {
    const LOGGERS: usize = 6;
    const MESSAGES: usize = 2_000;

    let logger = Arc::new(Logger::new("churn"));
    let stable = Arc::new(Counter::default());
    logger.add_handler(stable.clone());

    let stop = Arc::new(AtomicBool::new(false));
    let start = Arc::new(Barrier::new(LOGGERS + 1));

    let churner = {
        let (logger, stop, start) = (logger.clone(), stop.clone(), start.clone());
        thread::spawn(move || {
            start.wait();
            while !stop.load(Ordering::Relaxed) {
                let extra: Arc<dyn LogHandler> = Arc::new(Counter::default());
                assert!(logger.add_handler(Arc::clone(&extra)).ok());
                assert!(logger.remove_handler(&extra).ok());
            }
        })
    };

    let writers: Vec<_> = (0..LOGGERS - 1)
        .map(|t| {
            let (logger, start) = (logger.clone(), start.clone());
            thread::spawn(move || {
                start.wait();
                for n in 0..MESSAGES {
                    let s = logger.log(LogSeverity::Info, &format!("msg {t}/{n}"));
                    assert!(s.ok(), "{s}");
                }
            })
        })
        .collect();

    start.wait();
    for w in writers {
        w.join().unwrap();
    }
    stop.store(true, Ordering::Relaxed);
    churner.join().unwrap();

    assert_eq!(stable.seen.load(Ordering::Relaxed), (LOGGERS - 1) * MESSAGES);
    assert_eq!(logger.handler_count(), 1);
}

#[test]
fn handler_may_log_to_its_own_logger() {
    let logger = Arc::new(Logger::new("echo"));
    let counter = Arc::new(Counter::default());
    logger.add_handler(Arc::new(Echo { logger: Arc::clone(&logger), depth: AtomicUsize::new(0) }));
    logger.add_handler(counter.clone());

    assert!(logger.log(LogSeverity::Warning, "msg outer").ok());
    // Nested record reached the counter; the outer one did too.
    assert_eq!(counter.seen.load(Ordering::SeqCst), 2);
}
