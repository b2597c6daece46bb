//! # kern-status — exception-free outcomes
//!
//! Operations that can fail return a [`Status`] (or a [`StatusOr<T>`] when
//! they also produce a value) instead of unwinding. A status carries a
//! [`StatusCode`], an optional message and an optional trace.
//!
//! ## Quick Start
//!
//! ```rust
//! use kern_status::{Status, StatusCode, StatusOr};
//!
//! fn parse_port(s: &str) -> StatusOr<u16> {
//!     match s.parse::<u16>() {
//!         Ok(p) if p != 0 => StatusOr::new(p),
//!         Ok(_) => Status::invalid_argument_error("port 0").into(),
//!         Err(e) => StatusOr::from_fault(&e, false),
//!     }
//! }
//!
//! assert_eq!(parse_port("8080").val(), Some(&8080));
//! assert_eq!(parse_port("0").status().code(), StatusCode::InvalidArgument);
//! assert_eq!(parse_port("x").status().code(), StatusCode::ParseIntError);
//! ```
//!
//! ## Faults
//!
//! Errors from the standard library and panics can be folded into a status:
//! [`Status::from_fault`] classifies any `dyn Error` through the table in
//! [`fault`], and [`catch_status`] converts a panic into `PANIC`.
//!
//! ## Dependencies
//!
//! None.

mod code;
pub mod fault;
mod panic;
mod status;
mod status_or;

// ── Public API ────────────────────────────────────────────────────

pub use code::StatusCode;
pub use fault::{format_fault_trace, get_status_code_for_fault};
pub use panic::{catch_status, catch_status_or, panic_message};
pub use status::Status;
pub use status_or::StatusOr;

/// Convenience Result alias.
pub type KResult<T> = Result<T, Status>;
