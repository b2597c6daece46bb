use std::panic::Location;

use chrono::{DateTime, Local};

use crate::LogSeverity;

/// One log event as seen by handlers.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    severity: LogSeverity,
    message: &'a str,
    location: Option<&'static Location<'static>>,
    timestamp: DateTime<Local>,
}

impl<'a> LogRecord<'a> {
    /// A record stamped with the current local time and no call site.
    pub fn new(severity: LogSeverity, message: &'a str) -> Self {
        Self { severity, message, location: None, timestamp: Local::now() }
    }

    /// A record whose call site is the caller of this function.
    #[track_caller]
    pub fn here(severity: LogSeverity, message: &'a str) -> Self {
        Self::new(severity, message).with_location(Location::caller())
    }

    pub fn with_location(mut self, location: &'static Location<'static>) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[inline]
    pub fn severity(&self) -> LogSeverity {
        self.severity
    }

    #[inline]
    pub fn message(&self) -> &'a str {
        self.message
    }

    pub fn location(&self) -> Option<&'static Location<'static>> {
        self.location
    }

    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    /// Basename of the calling file, `"unknown"` without a call site.
    pub fn file_name(&self) -> &'static str {
        match self.location {
            Some(loc) => loc.file().rsplit(['/', '\\']).next().unwrap_or("unknown"),
            None => "unknown",
        }
    }

    /// Calling line, `-1` without a call site.
    pub fn line(&self) -> i64 {
        self.location.map_or(-1, |loc| i64::from(loc.line()))
    }
}
