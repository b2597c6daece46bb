//! Output sinks for [`Logger`](crate::Logger).
//!
//! Every handler guards its own state with its own lock and reports
//! failures as a [`Status`]; I/O errors never unwind out of `handle`.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use kern_core::Guarded;
use kern_status::{KResult, Status};

use crate::{LogFormatter, LogRecord};

const RESET: &str = "\x1b[0m";

/// A log sink.
pub trait LogHandler: Send + Sync {
    /// Write one record.
    fn handle(&self, record: &LogRecord<'_>) -> Status;

    /// Release resources. Must be safe to call more than once.
    fn close(&self) -> Status {
        Status::new()
    }
}

fn io_status(err: io::Error) -> Status {
    Status::from_fault(&err, false)
}

// ── Console ───────────────────────────────────────────────────────

/// Colored, formatted output to stdout or an injected writer.
///
/// Line layout: `<color><prefix><message>\x1b[0m\n`.
pub struct ConsoleLogHandler {
    formatter: LogFormatter,
    out: Guarded<Box<dyn Write + Send>>,
    flush: bool,
}

impl ConsoleLogHandler {
    /// Stdout with the default pattern.
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Stdout with a custom pattern.
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self::new().pattern(pattern)
    }

    /// Any writer with the default pattern.
    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self { formatter: LogFormatter::default(), out: Guarded::new(out), flush: true }
    }

    /// Replace the prefix pattern.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.formatter = LogFormatter::new(pattern);
        self
    }

    /// Flush after every record (default `true`).
    pub fn flush_each_write(mut self, flush: bool) -> Self {
        self.flush = flush;
        self
    }

    pub fn formatter(&self) -> &LogFormatter {
        &self.formatter
    }

    fn write_line(&self, line: &str) -> KResult<()> {
        let mut out = self.out.lock()?;
        out.write_all(line.as_bytes()).map_err(io_status)?;
        if self.flush {
            out.flush().map_err(io_status)?;
        }
        Ok(())
    }
}

impl Default for ConsoleLogHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl LogHandler for ConsoleLogHandler {
    fn handle(&self, record: &LogRecord<'_>) -> Status {
        let color = record.severity().color();
        let body = self.formatter.format(record);
        let mut line = String::with_capacity(color.len() + body.len() + RESET.len() + 1);
        line.push_str(color);
        line.push_str(&body);
        line.push_str(RESET);
        line.push('\n');

        match self.write_line(&line) {
            Ok(()) => Status::new(),
            Err(status) => status,
        }
    }

    fn close(&self) -> Status {
        match self.out.lock() {
            Ok(mut out) => out.flush().map_or_else(io_status, |()| Status::new()),
            Err(status) => status,
        }
    }
}

impl fmt::Debug for ConsoleLogHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleLogHandler")
            .field("pattern", &self.formatter.pattern())
            .field("flush", &self.flush)
            .finish()
    }
}

// ── File ──────────────────────────────────────────────────────────

/// Appends `[<SEVERITY>] <message>` lines to a file, flushing each one.
pub struct FileLogHandler {
    path: PathBuf,
    file: Guarded<Option<BufWriter<File>>>,
}

impl FileLogHandler {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> KResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                let code = Status::from_fault(&e, false).code();
                Status::custom_error(code, format!("Failed to open log file {}: {e}", path.display()))
            })?;
        tracing::debug!(path = %path.display(), "log file opened");
        Ok(Self { path, file: Guarded::new(Some(BufWriter::new(file))) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// False once [`LogHandler::close`] has run.
    pub fn is_open(&self) -> bool {
        self.file.lock().map_or(false, |f| f.is_some())
    }
}

impl LogHandler for FileLogHandler {
    fn handle(&self, record: &LogRecord<'_>) -> Status {
        let mut file = match self.file.lock() {
            Ok(f) => f,
            Err(status) => return status,
        };
        let Some(w) = file.as_mut() else {
            return Status::failed_precondition_error(format!(
                "log file {} is closed",
                self.path.display()
            ));
        };
        let res = writeln!(w, "[{}] {}", record.severity().name(), record.message())
            .and_then(|()| w.flush());
        match res {
            Ok(()) => Status::new(),
            Err(e) => io_status(e),
        }
    }

    fn close(&self) -> Status {
        let mut file = match self.file.lock() {
            Ok(f) => f,
            Err(status) => return status,
        };
        match file.take() {
            Some(w) => {
                tracing::debug!(path = %self.path.display(), "log file closed");
                // into_inner flushes; dropping the File closes it.
                match w.into_inner() {
                    Ok(_file) => Status::new(),
                    Err(e) => io_status(e.into_error()),
                }
            }
            None => Status::new(),
        }
    }
}

impl fmt::Debug for FileLogHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLogHandler").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogSeverity;
    use kern_status::StatusCode;
    use std::sync::{Arc, Mutex as StdMutex};

    /// Writer that appends into a shared buffer.
    #[derive(Clone, Default)]
    struct Capture(Arc<StdMutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn console_colors_and_resets() {
        let cap = Capture::default();
        let h = ConsoleLogHandler::with_writer(Box::new(cap.clone())).pattern("");
        assert!(h.handle(&LogRecord::new(LogSeverity::Info, "a")).ok());
        assert!(h.handle(&LogRecord::new(LogSeverity::Warning, "b")).ok());
        assert!(h.handle(&LogRecord::new(LogSeverity::Error, "c")).ok());
        assert!(h.handle(&LogRecord::new(LogSeverity::Fatal, "d")).ok());
        assert_eq!(
            cap.text(),
            "\x1b[0ma\x1b[0m\n\x1b[33mb\x1b[0m\n\x1b[31mc\x1b[0m\n\x1b[35md\x1b[0m\n"
        );
    }

    #[test]
    fn console_default_prefix() {
        let cap = Capture::default();
        let h = ConsoleLogHandler::with_writer(Box::new(cap.clone()));
        let line = line!() + 1;
        assert!(h.handle(&LogRecord::here(LogSeverity::Info, "hello")).ok());
        let text = cap.text();
        assert!(text.starts_with("\x1b[0mI"));
        assert!(text.ends_with(&format!("[handler.rs:{line}] hello\x1b[0m\n")));
    }

    #[test]
    fn console_write_error_is_status() {
        let h = ConsoleLogHandler::with_writer(Box::new(Broken));
        let s = h.handle(&LogRecord::new(LogSeverity::Error, "x"));
        assert_eq!(s.code(), StatusCode::BrokenPipeError);
    }

    #[test]
    fn file_appends_and_closes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "existing\n").unwrap();

        let h = FileLogHandler::open(&path).unwrap();
        assert!(h.is_open());
        assert!(h.handle(&LogRecord::new(LogSeverity::Info, "hello")).ok());
        assert!(h.handle(&LogRecord::new(LogSeverity::Error, "bad")).ok());
        // Flushed per write: visible before close.
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "existing\n[INFO] hello\n[ERROR] bad\n");

        assert!(h.close().ok());
        assert!(h.close().ok());
        assert!(!h.is_open());
        let after = h.handle(&LogRecord::new(LogSeverity::Info, "late"));
        assert_eq!(after.code(), StatusCode::FailedPrecondition);
    }

    #[test]
    fn file_open_failure_is_status() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no_such_dir").join("x.log");
        let err = FileLogHandler::open(&missing).unwrap_err();
        assert_eq!(err.code(), StatusCode::FileNotFoundError);
        assert!(err.message().unwrap().starts_with("Failed to open log file"));
    }
}
