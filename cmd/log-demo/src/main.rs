//! kern logging walkthrough
//!
//! Initializes the default logger, logs at every severity, spins up a few
//! threads with their own loggers and shows how faults turn into `Status`.
//!
//! # Environment Variables
//!
//! - `KERN_LOG_DIR=/tmp/kern` - Also write `log-demo.log` (and one file per thread) there
//! - `KERN_LOG_PATTERN='[%severity%] '` - Console prefix pattern
//! - `KERN_LOG_FLUSH=0` - Do not flush the console after every record

use std::thread;

use kern::{
    catch_status, close_kern_logging, close_thread_specific_kern_logging, dcheck, init_kern_logging_with,
    init_thread_specific_kern_logging_with, klog, ktlog, log_error, log_info, log_warning,
    LogConfig, Logger, LoggerRegistry, Status, StatusCode, StatusOr,
};

// KERN_LOG_DIR=/tmp/kern cargo run -p kern-log-demo
fn main() {
    println!("=== kern log demo ===\n");

    let config = LogConfig::from_env();
    let status = init_kern_logging_with("log-demo", &config);
    if !status.ok() {
        eprintln!("logging init failed: {status}");
        std::process::exit(1);
    }

    log_info("demo started");
    log_warning("this is a warning");
    log_error("this is an error");
    klog!(Info, "pattern in use: {:?}", config.pattern);

    // Statuses
    println!("\n--- Status / StatusOr ---");
    for input in ["42", "0", "forty-two"] {
        let r = parse_divisor(input);
        match r.val() {
            Some(v) => klog!(Info, "parse_divisor({input:?}) = {v}"),
            None => klog!(Warning, "parse_divisor({input:?}) failed: {}", r.status()),
        };
    }

    let missing = std::fs::read("/nonexistent/kern/demo");
    if let Err(e) = missing {
        let s = Status::from_fault(&e, false);
        dcheck!(s.code() == StatusCode::FileNotFoundError);
        klog!(Info, "io fault mapped to {}", s.code());
    }

    // Panics
    println!("\n--- Panics ---");
    let caught = catch_status(|| {
        let slots: Vec<u32> = Vec::new();
        klog!(Info, "slot 3 = {}", slots[3]);
        Status::new()
    });
    klog!(Error, "caught: {}", caught);

    // Per-thread loggers
    println!("\n--- Thread loggers ---");
    let workers: Vec<_> = (0..3)
        .map(|i| {
            let config = config.clone();
            thread::Builder::new()
                .name(format!("worker-{i}"))
                .spawn(move || {
                    let status = init_thread_specific_kern_logging_with(&config);
                    if !status.ok() {
                        eprintln!("thread logging init failed: {status}");
                        return;
                    }
                    for step in 0..3 {
                        ktlog!(Info, "step {step}");
                    }
                    let _ = close_thread_specific_kern_logging();
                    Logger::cleanup_thread_logger();
                })
        })
        .collect::<std::io::Result<Vec<_>>>()
        .unwrap_or_else(|e| {
            eprintln!("spawn failed: {e}");
            Vec::new()
        });

    for w in workers {
        let _ = w.join();
    }
    klog!(Info, "registered loggers: {:?}", LoggerRegistry::global().registered_names());

    let status = close_kern_logging();
    println!("\nclose_kern_logging: {status}");
    println!("\n=== done ===");
}

fn parse_divisor(s: &str) -> StatusOr<i64> {
    match s.parse::<i64>() {
        Ok(0) => Status::zero_division_error("divisor is zero").into(),
        Ok(v) => StatusOr::new(v),
        Err(e) => StatusOr::from_fault(&e, false),
    }
}
