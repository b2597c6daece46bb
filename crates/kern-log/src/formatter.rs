//! Prefix formatting for console output.
//!
//! | Placeholder  | Expands to                         |
//! |--------------|------------------------------------|
//! | `%Y`         | year, 4 digits                     |
//! | `%m` `%d`    | month, day, 2 digits               |
//! | `%H` `%M` `%S` | hour, minute, second, 2 digits   |
//! | `%f`         | microseconds, 6 digits             |
//! | `%severity%` | severity letter (`I`, `W`, ...)    |
//! | `%F`         | basename of the calling file       |
//! | `%L`         | calling line                       |
//!
//! Any other `%x` sequence is copied through unchanged. The pattern is
//! parsed once, so text produced by one placeholder is never rescanned.

use std::fmt::Write as _;

use chrono::{Datelike, Timelike};

use crate::LogRecord;

/// glog-style prefix: `I20250101 12:00:00.000000 [main.rs:10] `.
pub const DEFAULT_PATTERN: &str = "%severity%%Y%m%d %H:%M:%S.%f [%F:%L] ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Micros,
    Severity,
    File,
    Line,
}

/// Renders `prefix + message` for a [`LogRecord`].
#[derive(Debug, Clone)]
pub struct LogFormatter {
    pattern: String,
    segments: Vec<Segment>,
}

impl LogFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let segments = parse(&pattern);
        Self { pattern, segments }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Prefix followed by the record's message.
    pub fn format(&self, record: &LogRecord<'_>) -> String {
        let mut out = String::with_capacity(self.pattern.len() + record.message().len() + 32);
        self.write_prefix(&mut out, record);
        out.push_str(record.message());
        out
    }

    /// The expanded pattern alone.
    pub fn format_prefix(&self, record: &LogRecord<'_>) -> String {
        let mut out = String::with_capacity(self.pattern.len() + 32);
        self.write_prefix(&mut out, record);
        out
    }

    fn write_prefix(&self, out: &mut String, record: &LogRecord<'_>) {
        let ts = record.timestamp();
        for seg in &self.segments {
            // Writing into a String cannot fail.
            let _ = match seg {
                Segment::Literal(s) => {
                    out.push_str(s);
                    Ok(())
                }
                Segment::Year => write!(out, "{:04}", ts.year()),
                Segment::Month => write!(out, "{:02}", ts.month()),
                Segment::Day => write!(out, "{:02}", ts.day()),
                Segment::Hour => write!(out, "{:02}", ts.hour()),
                Segment::Minute => write!(out, "{:02}", ts.minute()),
                Segment::Second => write!(out, "{:02}", ts.second()),
                // Leap seconds report >= 1_000_000.
                Segment::Micros => write!(out, "{:06}", ts.timestamp_subsec_micros().min(999_999)),
                Segment::Severity => {
                    out.push(record.severity().letter());
                    Ok(())
                }
                Segment::File => {
                    out.push_str(record.file_name());
                    Ok(())
                }
                Segment::Line => write!(out, "{}", record.line()),
            };
        }
    }
}

impl Default for LogFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

fn parse(pattern: &str) -> Vec<Segment> {
    const SEVERITY: &str = "severity%";

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = pattern;

    while let Some(pos) = rest.find('%') {
        literal.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix(SEVERITY) {
            flush(&mut segments, &mut literal);
            segments.push(Segment::Severity);
            rest = tail;
            continue;
        }

        let mut chars = after.chars();
        let seg = match chars.next() {
            Some('Y') => Some(Segment::Year),
            Some('m') => Some(Segment::Month),
            Some('d') => Some(Segment::Day),
            Some('H') => Some(Segment::Hour),
            Some('M') => Some(Segment::Minute),
            Some('S') => Some(Segment::Second),
            Some('f') => Some(Segment::Micros),
            Some('F') => Some(Segment::File),
            Some('L') => Some(Segment::Line),
            _ => None,
        };
        match seg {
            Some(seg) => {
                flush(&mut segments, &mut literal);
                segments.push(seg);
                rest = chars.as_str();
            }
            None => {
                // Unknown or trailing `%`: keep it literally.
                literal.push('%');
                rest = after;
            }
        }
    }
    literal.push_str(rest);
    flush(&mut segments, &mut literal);
    segments
}

fn flush(segments: &mut Vec<Segment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}
