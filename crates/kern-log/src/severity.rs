use std::fmt;

/// Severity of a log record.
///
/// Ordered `Info < Warning < Error < Fatal`. The order is for display only;
/// loggers do not filter by severity.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogSeverity {
    Info = 0,
    Warning = 1,
    Error = 2,
    Fatal = 3,
}

impl LogSeverity {
    pub const ALL: [LogSeverity; 4] = [
        LogSeverity::Info,
        LogSeverity::Warning,
        LogSeverity::Error,
        LogSeverity::Fatal,
    ];

    /// `"INFO"`, `"WARNING"`, `"ERROR"` or `"FATAL"`.
    pub const fn name(self) -> &'static str {
        match self {
            LogSeverity::Info => "INFO",
            LogSeverity::Warning => "WARNING",
            LogSeverity::Error => "ERROR",
            LogSeverity::Fatal => "FATAL",
        }
    }

    /// First letter of the name, used by the `%severity%` placeholder.
    pub const fn letter(self) -> char {
        match self {
            LogSeverity::Info => 'I',
            LogSeverity::Warning => 'W',
            LogSeverity::Error => 'E',
            LogSeverity::Fatal => 'F',
        }
    }

    /// ANSI color used by the console handler.
    pub(crate) const fn color(self) -> &'static str {
        match self {
            LogSeverity::Info => "\x1b[0m",
            LogSeverity::Warning => "\x1b[33m",
            LogSeverity::Error => "\x1b[31m",
            LogSeverity::Fatal => "\x1b[35m",
        }
    }
}

impl TryFrom<i32> for LogSeverity {
    type Error = i32;

    fn try_from(v: i32) -> Result<Self, i32> {
        usize::try_from(v)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(v)
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
