//! Invariant checks.
//!
//! `check!` is always on. The `dcheck!` family is compiled in when
//! `debug_assertions` is set or the `dcheck-always` feature is enabled;
//! otherwise the checked expressions are never evaluated.
//!
//! A failing check prints
//!
//! ```text
//! FATAL ERROR: <file>:<line>: <message>
//! ```
//!
//! to stderr and exits the process with status 1. Checks are for
//! programmer errors only; recoverable failures return a `Status`.
//!
//! # Usage
//!
//! ```ignore
//! use kern_core::{dcheck, dcheck_eq, dcheck_some};
//!
//! dcheck!(idx < len, "index {} out of range {}", idx, len);
//! dcheck_eq!(header.version, 2);
//! dcheck_some!(cache.get(&key));
//! ```

use std::fmt;
use std::io::Write;

cfg_if::cfg_if! {
    if #[cfg(any(debug_assertions, feature = "dcheck-always"))] {
        /// True when the `dcheck!` family is active in this build.
        pub const DCHECK_ENABLED: bool = true;
    } else {
        /// True when the `dcheck!` family is active in this build.
        pub const DCHECK_ENABLED: bool = false;
    }
}

/// Print `FATAL ERROR: <file>:<line>: <msg>` to stderr and exit with
/// status 1.
#[cold]
#[inline(never)]
pub fn check_failed(file: &str, line: u32, msg: fmt::Arguments<'_>) -> ! {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = writeln!(handle, "FATAL ERROR: {}:{}: {}", file, line, msg);
    let _ = handle.flush();
    std::process::exit(1)
}

/// Always-on check.
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {
        if !$cond {
            $crate::check::check_failed(
                file!(), line!(),
                format_args!("Check failed: {}", stringify!($cond)),
            );
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::check::check_failed(file!(), line!(), format_args!($($arg)+));
        }
    };
}

/// Debug-only check. The condition is not evaluated when disabled.
#[macro_export]
macro_rules! dcheck {
    ($cond:expr $(,)?) => {
        if $crate::check::DCHECK_ENABLED && !$cond {
            $crate::check::check_failed(
                file!(), line!(),
                format_args!("Check failed: {}", stringify!($cond)),
            );
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if $crate::check::DCHECK_ENABLED && !$cond {
            $crate::check::check_failed(file!(), line!(), format_args!($($arg)+));
        }
    };
}

/// Debug-only `a == b`.
#[macro_export]
macro_rules! dcheck_eq {
    ($a:expr, $b:expr $(,)?) => {
        if $crate::check::DCHECK_ENABLED {
            match (&$a, &$b) {
                (a, b) => {
                    if *a != *b {
                        $crate::check::check_failed(
                            file!(), line!(),
                            format_args!("{:?} is NOT equal to {:?}", a, b),
                        );
                    }
                }
            }
        }
    };
}

/// Debug-only `a != b`.
#[macro_export]
macro_rules! dcheck_ne {
    ($a:expr, $b:expr $(,)?) => {
        if $crate::check::DCHECK_ENABLED {
            match (&$a, &$b) {
                (a, b) => {
                    if *a == *b {
                        $crate::check::check_failed(
                            file!(), line!(),
                            format_args!("{:?} is equal to {:?}", a, b),
                        );
                    }
                }
            }
        }
    };
}

/// Debug-only `a > b`.
#[macro_export]
macro_rules! dcheck_gt {
    ($a:expr, $b:expr $(,)?) => {
        if $crate::check::DCHECK_ENABLED {
            match (&$a, &$b) {
                (a, b) => {
                    if !(*a > *b) {
                        $crate::check::check_failed(
                            file!(), line!(),
                            format_args!("{:?} is NOT greater than {:?}", a, b),
                        );
                    }
                }
            }
        }
    };
}

/// Debug-only `opt.is_some()`.
#[macro_export]
macro_rules! dcheck_some {
    ($opt:expr $(,)?) => {
        if $crate::check::DCHECK_ENABLED && ::core::option::Option::is_none(&$opt) {
            $crate::check::check_failed(
                file!(), line!(),
                format_args!("Value should not be None"),
            );
        }
    };
}

/// Debug-only check that an integer names a member of `$enum`, i.e.
/// `<$enum as TryFrom<i32>>::try_from(value)` succeeds.
#[macro_export]
macro_rules! dcheck_in_enum {
    ($val:expr, $enum:ty $(,)?) => {
        if $crate::check::DCHECK_ENABLED {
            let v: i32 = $val;
            if <$enum as ::core::convert::TryFrom<i32>>::try_from(v).is_err() {
                $crate::check::check_failed(
                    file!(), line!(),
                    format_args!(
                        "Value {} is not a valid member of enum {}",
                        v, stringify!($enum),
                    ),
                );
            }
        }
    };
}
