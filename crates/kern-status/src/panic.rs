//! Panic capture: run a closure and turn an unwinding panic into a
//! `PANIC` [`Status`] instead of letting it cross the call.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::fault::push_backtrace;
use crate::{Status, StatusCode, StatusOr};

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<Status>() {
        s.message().unwrap_or("panic carrying a Status")
    } else {
        "Box<dyn Any>"
    }
}

impl Status {
    /// Convert a caught panic payload into a status.
    ///
    /// A payload that is itself a `Status` (from `std::panic::panic_any`)
    /// is returned unchanged. Anything else becomes `PANIC` with the panic
    /// message and a trace.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Status {
        if let Some(status) = payload.downcast_ref::<Status>() {
            return status.clone();
        }
        let msg = panic_message(payload);
        let mut trace = String::from("Traceback (most recent call last):\n");
        push_backtrace(&mut trace, &Backtrace::capture());
        trace.push_str("panicked: ");
        trace.push_str(msg);
        trace.push('\n');
        Status::with_code(StatusCode::Panic, msg).with_trace(trace)
    }
}

/// Run `f`; a panic inside it is returned as a status.
pub fn catch_status<F>(f: F) -> Status
where
    F: FnOnce() -> Status,
{
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Status::from_panic(&*payload))
}

/// Run `f`; a panic inside it is returned as a status-only `StatusOr`.
pub fn catch_status_or<T, F>(f: F) -> StatusOr<T>
where
    F: FnOnce() -> StatusOr<T>,
{
    catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| StatusOr::from_status(Status::from_panic(&*payload)))
}
