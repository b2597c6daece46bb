//! Environment variable helpers used by `KERN_*` configuration.
//!
//! # Usage
//!
//! ```ignore
//! use kern_core::env::{env_get_bool, env_get_path, env_get_str};
//!
//! let dir = env_get_path("KERN_LOG_DIR");
//! let flush = env_get_bool("KERN_LOG_FLUSH", true);
//! let pattern = env_get_str("KERN_LOG_PATTERN", "%L ");
//! ```

use std::path::PathBuf;

/// Boolean flag.
///
/// `1`, `true`, `yes`, `on` are true and `0`, `false`, `no`, `off` are
/// false (case-insensitive). Unset or anything else yields `default`.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// String value or `default`.
#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Non-empty path value.
pub fn env_get_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from)
}
