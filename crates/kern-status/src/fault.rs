//! Classification of standard-library faults into [`StatusCode`]s.
//!
//! A fault is any `&(dyn Error + 'static)`. Classification runs in two steps:
//!
//! 1. **Exact type.** If the fault's concrete type has a row in the table,
//!    that row decides. `io::Error` is classified by its `ErrorKind`.
//! 2. **Is-a.** Otherwise the fault's cause chain is searched. Rows are
//!    scanned in declaration order and the first row whose type appears
//!    anywhere in the chain wins. Rows are declared most-specific first, so
//!    a parse error buried inside an `io::Error` beats the `io::Error` row.
//!
//! Anything left over is `UNKNOWN`.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt::Write as _;
use std::io;

use crate::{Status, StatusCode};

// ── Table ─────────────────────────────────────────────────────────

/// How a matching row turns the fault into a code.
#[derive(Clone, Copy)]
enum Classify {
    Fixed(StatusCode),
    /// `io::Error`: look at `kind()`.
    IoKind,
    /// A `Status` travelling as a fault keeps its own code.
    Passthrough,
}

struct FaultRule {
    matches: fn(&(dyn Error + 'static)) -> bool,
    classify: Classify,
}

fn is<T: Error + 'static>(e: &(dyn Error + 'static)) -> bool {
    e.is::<T>()
}

macro_rules! rule {
    ($ty:ty => $class:expr) => {
        FaultRule { matches: is::<$ty>, classify: $class }
    };
}

/// Declaration order is the fallback priority. Leaf errors first, the
/// broad `io::Error` wrapper last.
static FAULT_TABLE: &[FaultRule] = &[
    rule!(std::num::ParseIntError            => Classify::Fixed(StatusCode::ParseIntError)),
    rule!(std::num::ParseFloatError          => Classify::Fixed(StatusCode::ParseFloatError)),
    rule!(std::str::ParseBoolError           => Classify::Fixed(StatusCode::ParseBoolError)),
    rule!(std::char::ParseCharError          => Classify::Fixed(StatusCode::ParseCharError)),
    rule!(std::net::AddrParseError           => Classify::Fixed(StatusCode::AddrParseError)),
    rule!(std::str::Utf8Error                => Classify::Fixed(StatusCode::Utf8Error)),
    rule!(std::string::FromUtf8Error         => Classify::Fixed(StatusCode::FromUtf8Error)),
    rule!(std::num::TryFromIntError          => Classify::Fixed(StatusCode::TryFromIntError)),
    rule!(std::fmt::Error                    => Classify::Fixed(StatusCode::FmtError)),
    rule!(std::sync::mpsc::RecvError         => Classify::Fixed(StatusCode::RecvError)),
    rule!(std::sync::mpsc::RecvTimeoutError  => Classify::Fixed(StatusCode::RecvTimeoutError)),
    rule!(std::sync::mpsc::TryRecvError      => Classify::Fixed(StatusCode::TryRecvError)),
    rule!(std::time::SystemTimeError         => Classify::Fixed(StatusCode::SystemTimeError)),
    rule!(std::ffi::NulError                 => Classify::Fixed(StatusCode::NulError)),
    rule!(std::env::VarError                 => Classify::Fixed(StatusCode::EnvVarError)),
    rule!(std::collections::TryReserveError  => Classify::Fixed(StatusCode::MemoryError)),
    rule!(Status                             => Classify::Passthrough),
    rule!(io::Error                          => Classify::IoKind),
];

/// Maps `io::ErrorKind` to a fault-band code.
pub(crate) fn io_kind_code(kind: io::ErrorKind) -> StatusCode {
    match kind {
        io::ErrorKind::NotFound          => StatusCode::FileNotFoundError,
        io::ErrorKind::PermissionDenied  => StatusCode::PermissionError,
        io::ErrorKind::ConnectionRefused => StatusCode::ConnectionRefusedError,
        io::ErrorKind::ConnectionReset   => StatusCode::ConnectionResetError,
        io::ErrorKind::ConnectionAborted => StatusCode::ConnectionAbortedError,
        io::ErrorKind::NotConnected      => StatusCode::NotConnectedError,
        io::ErrorKind::AddrInUse         => StatusCode::AddrInUseError,
        io::ErrorKind::AddrNotAvailable  => StatusCode::AddrNotAvailableError,
        io::ErrorKind::BrokenPipe        => StatusCode::BrokenPipeError,
        io::ErrorKind::AlreadyExists     => StatusCode::FileExistsError,
        io::ErrorKind::WouldBlock        => StatusCode::WouldBlockError,
        io::ErrorKind::InvalidInput      => StatusCode::InvalidInputError,
        io::ErrorKind::InvalidData       => StatusCode::InvalidDataError,
        io::ErrorKind::TimedOut          => StatusCode::TimeoutError,
        io::ErrorKind::WriteZero         => StatusCode::WriteZeroError,
        io::ErrorKind::Interrupted       => StatusCode::InterruptedError,
        io::ErrorKind::Unsupported       => StatusCode::UnsupportedError,
        io::ErrorKind::UnexpectedEof     => StatusCode::EofError,
        io::ErrorKind::OutOfMemory       => StatusCode::MemoryError,
        _                                => StatusCode::IoError,
    }
}

fn apply(class: Classify, fault: &(dyn Error + 'static)) -> StatusCode {
    match class {
        Classify::Fixed(code) => code,
        Classify::IoKind => fault
            .downcast_ref::<io::Error>()
            .map_or(StatusCode::IoError, |e| io_kind_code(e.kind())),
        Classify::Passthrough => fault
            .downcast_ref::<Status>()
            .map_or(StatusCode::Unknown, Status::code),
    }
}

// ── Cause chain ───────────────────────────────────────────────────

/// Iterator over a fault's causes, outermost first, excluding the fault.
///
/// `io::Error::source()` skips the error it wraps, so a wrapped payload is
/// yielded explicitly before continuing with its own sources.
pub struct Causes<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Causes<'a> {
    fn step(e: &'a (dyn Error + 'static)) -> Option<&'a (dyn Error + 'static)> {
        if let Some(io) = e.downcast_ref::<io::Error>() {
            if let Some(inner) = io.get_ref() {
                return Some(inner as &(dyn Error + 'static));
            }
        }
        e.source()
    }
}

impl<'a> Iterator for Causes<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.next?;
        self.next = Self::step(cur);
        Some(cur)
    }
}

/// Causes of `fault`, outermost first. `fault` itself is not included.
pub fn causes<'a>(fault: &'a (dyn Error + 'static)) -> Causes<'a> {
    Causes { next: Causes::step(fault) }
}

// ── Public API ────────────────────────────────────────────────────

/// Classify a fault. Never fails; unmatched faults are `UNKNOWN`.
pub fn get_status_code_for_fault(fault: &(dyn Error + 'static)) -> StatusCode {
    if let Some(rule) = FAULT_TABLE.iter().find(|r| (r.matches)(fault)) {
        return apply(rule.classify, fault);
    }

    for rule in FAULT_TABLE {
        if let Some(cause) = causes(fault).find(|c| (rule.matches)(*c)) {
            return apply(rule.classify, cause);
        }
    }

    StatusCode::Unknown
}

/// Render a human-readable trace for `fault`.
///
/// The text always starts with `Traceback`, followed by the backtrace of
/// the calling thread (when `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE` enable
/// capture) and the cause chain, innermost last.
pub fn format_fault_trace(fault: &(dyn Error + 'static)) -> String {
    let mut out = String::from("Traceback (most recent call last):\n");
    push_backtrace(&mut out, &Backtrace::capture());
    let _ = writeln!(out, "Error: {fault}");
    for cause in causes(fault) {
        let _ = writeln!(out, "Caused by: {cause}");
    }
    out
}

pub(crate) fn push_backtrace(out: &mut String, bt: &Backtrace) {
    match bt.status() {
        BacktraceStatus::Captured => {
            let _ = writeln!(out, "{bt}");
        }
        _ => out.push_str("  <backtrace not captured; set RUST_BACKTRACE=1>\n"),
    }
}
