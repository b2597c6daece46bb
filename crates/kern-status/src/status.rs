use std::error::Error;
use std::fmt;
use std::io;

use crate::fault::{format_fault_trace, get_status_code_for_fault, io_kind_code};
use crate::{KResult, StatusCode};

/// Outcome of an operation: a [`StatusCode`], an optional message and an
/// optional trace.
///
/// `Status` is a plain value. Everything except the trace is fixed at
/// construction; the trace may be attached once afterwards with
/// [`Status::set_trace`].
///
/// ```
/// use kern_status::{Status, StatusCode};
///
/// fn divide(a: i32, b: i32) -> Status {
///     if b == 0 {
///         return Status::zero_division_error("b must not be zero");
///     }
///     let _ = a / b;
///     Status::new()
/// }
///
/// assert!(divide(4, 2).ok());
/// assert_eq!(divide(1, 0).code(), StatusCode::ZeroDivision);
/// assert_eq!(divide(1, 0).to_string(), "ZERO_DIVISION: b must not be zero");
/// ```
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Status {
    code: StatusCode,
    message: Option<String>,
    trace: Option<String>,
}

// ── Constructors ──────────────────────────────────────────────────

impl Status {
    /// An OK status with no message.
    #[inline]
    pub const fn new() -> Self {
        Self { code: StatusCode::Ok, message: None, trace: None }
    }

    /// A status with `code` and no message.
    #[inline]
    pub const fn from_code(code: StatusCode) -> Self {
        Self { code, message: None, trace: None }
    }

    /// A status with `code` and `message`.
    pub fn with_code(code: StatusCode, message: impl Into<String>) -> Self {
        Self { code, message: Some(message.into()), trace: None }
    }

    /// Build a status from a caught fault.
    ///
    /// The code comes from [`get_status_code_for_fault`], the message from
    /// the fault's `Display`. A `Status` passed as the fault is cloned as is.
    pub fn from_fault(fault: &(dyn Error + 'static), include_trace: bool) -> Self {
        if let Some(status) = fault.downcast_ref::<Status>() {
            return status.clone();
        }
        let mut status = Self::with_code(get_status_code_for_fault(fault), fault.to_string());
        if include_trace {
            status.trace = Some(format_fault_trace(fault));
        }
        status
    }

    pub fn invalid_argument_error(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::InvalidArgument, message)
    }

    pub fn not_found_error(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::NotFound, message)
    }

    pub fn zero_division_error(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::ZeroDivision, message)
    }

    pub fn failed_precondition_error(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::FailedPrecondition, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::Internal, message)
    }

    /// Any code with a message. Same as [`Status::with_code`].
    pub fn custom_error(code: StatusCode, message: impl Into<String>) -> Self {
        Self::with_code(code, message)
    }
}

// ── Accessors ─────────────────────────────────────────────────────

impl Status {
    /// True iff the code is `OK`.
    #[inline]
    pub fn ok(&self) -> bool {
        self.code.is_ok()
    }

    #[inline]
    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    /// Attach a trace. Intended for the code path that built this status.
    pub fn set_trace(&mut self, trace: impl Into<String>) {
        self.trace = Some(trace.into());
    }

    /// Builder form of [`Status::set_trace`].
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.set_trace(trace);
        self
    }

    /// `Ok(())` for an OK status, `Err(self)` otherwise.
    pub fn into_result(self) -> KResult<()> {
        if self.ok() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

// ── Trait impls ───────────────────────────────────────────────────

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ok() {
            return f.write_str("OK");
        }
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.code.name(), msg),
            None => f.write_str(self.code.name()),
        }
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Status");
        d.field("code", &format_args!("{}", self.code.name()));
        if let Some(msg) = &self.message {
            d.field("message", msg);
        }
        if let Some(trace) = &self.trace {
            d.field("trace", &format_args!("<{} bytes>", trace.len()));
        }
        d.finish()
    }
}

impl Error for Status {}

impl From<io::Error> for Status {
    /// Classify by `ErrorKind`. No trace is attached.
    fn from(err: io::Error) -> Self {
        Self::with_code(io_kind_code(err.kind()), err.to_string())
    }
}

impl From<StatusCode> for Status {
    fn from(code: StatusCode) -> Self {
        Self::from_code(code)
    }
}
