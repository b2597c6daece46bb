use std::any::{type_name, Any};
use std::error::Error;
use std::io::{self, Write};
use std::panic::Location;

use crate::{KResult, Status};

/// Either a value of `T` or the [`Status`] explaining why there is none.
///
/// Invariant: a present value implies an OK status, and a non-OK status
/// implies no value. An OK status without a value is legal; it is the
/// null value produced by [`StatusOr::null`].
///
/// ```
/// use kern_status::{Status, StatusOr, StatusCode};
///
/// fn lookup(key: &str) -> StatusOr<u32> {
///     match key {
///         "one" => StatusOr::new(1),
///         _ => Status::not_found_error(format!("no key {key}")).into(),
///     }
/// }
///
/// assert_eq!(lookup("one").val(), Some(&1));
/// assert_eq!(lookup("two").status().code(), StatusCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOr<T> {
    val: Option<T>,
    status: Status,
}

impl<T> StatusOr<T> {
    /// OK with `value`.
    pub fn new(value: T) -> Self {
        Self { val: Some(value), status: Status::new() }
    }

    /// Carry `status` and no value.
    pub fn from_status(status: Status) -> Self {
        Self { val: None, status }
    }

    /// OK without a value.
    pub fn null() -> Self {
        Self { val: None, status: Status::new() }
    }

    /// Wrap a caught fault. See [`Status::from_fault`].
    pub fn from_fault(fault: &(dyn Error + 'static), include_trace: bool) -> Self {
        Self::from_status(Status::from_fault(fault, include_trace))
    }

    #[inline]
    pub fn ok(&self) -> bool {
        self.status.ok()
    }

    #[inline]
    pub fn status(&self) -> &Status {
        &self.status
    }

    #[inline]
    pub fn val(&self) -> Option<&T> {
        self.val.as_ref()
    }

    pub fn val_mut(&mut self) -> Option<&mut T> {
        self.val.as_mut()
    }

    /// Consume and return the value, dropping the status.
    pub fn into_val(self) -> Option<T> {
        self.val
    }

    /// `Ok(value)` when OK (`Ok(None)` for the null value), `Err(status)`
    /// otherwise.
    pub fn into_result(self) -> KResult<Option<T>> {
        if self.status.ok() {
            Ok(self.val)
        } else {
            Err(self.status)
        }
    }
}

// ── Dynamic construction ──────────────────────────────────────────

impl<T: 'static> StatusOr<T> {
    /// Build from a dynamically typed value.
    ///
    /// `None` yields the null value. A value of any type other than `T`
    /// terminates the process with exit code 1 after printing a located
    /// diagnostic to stderr.
    #[track_caller]
    pub fn from_any(value: Option<Box<dyn Any>>) -> Self {
        match value {
            None => Self::null(),
            Some(boxed) => match boxed.downcast::<T>() {
                Ok(v) => Self::new(*v),
                Err(_) => type_mismatch(type_name::<T>(), "a value of another type", Location::caller()),
            },
        }
    }

    /// Like [`StatusOr::from_any`], naming the offending type in the
    /// diagnostic.
    #[track_caller]
    pub fn from_value<V: Any>(value: Option<V>) -> Self {
        match value {
            None => Self::null(),
            Some(v) => match (Box::new(v) as Box<dyn Any>).downcast::<T>() {
                Ok(v) => Self::new(*v),
                Err(_) => type_mismatch(type_name::<T>(), type_name::<V>(), Location::caller()),
            },
        }
    }
}

#[cold]
fn type_mismatch(expected: &str, got: &str, loc: &Location<'_>) -> ! {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    let _ = writeln!(
        handle,
        "Expected value of type {expected}, got {got} at {}:{}",
        loc.file(),
        loc.line()
    );
    let _ = handle.flush();
    std::process::exit(1)
}

// ── Conversions ───────────────────────────────────────────────────

impl<T> Default for StatusOr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<Status> for StatusOr<T> {
    fn from(status: Status) -> Self {
        Self::from_status(status)
    }
}

impl<T, E: Into<Status>> From<Result<T, E>> for StatusOr<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Self::new(v),
            Err(e) => Self::from_status(e.into()),
        }
    }
}
