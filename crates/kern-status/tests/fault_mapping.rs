//! Fault classification through the public API.

use std::error::Error;
use std::fmt;
use std::io;

use kern_status::fault::causes;
use kern_status::{get_status_code_for_fault, Status, StatusCode, StatusOr};

#[derive(Debug)]
struct ConfigError {
    source: io::Error,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config unreadable")
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

fn read_missing() -> io::Result<String> {
    std::fs::read_to_string("/definitely/not/here/kern.conf")
}

#[test]
fn real_missing_file() {
    let err = read_missing().unwrap_err();
    let status: Status = err.into();
    assert_eq!(status.code(), StatusCode::FileNotFoundError);
    assert!(!status.ok());
}

#[test]
fn user_error_wrapping_io() {
    let err = ConfigError { source: read_missing().unwrap_err() };
    assert_eq!(get_status_code_for_fault(&err), StatusCode::FileNotFoundError);

    let status = Status::from_fault(&err, true);
    assert_eq!(status.message(), Some("config unreadable"));
    let trace = status.trace().unwrap();
    assert!(trace.starts_with("Traceback"));
    assert!(trace.contains("Caused by:"));
}

#[test]
fn utf8_inside_io() {
    let bytes = vec![0xff, 0xfe];
    let utf8 = String::from_utf8(bytes).unwrap_err();
    let io = io::Error::new(io::ErrorKind::Other, utf8);
    // io::Error is the exact type, classified by kind.
    assert_eq!(get_status_code_for_fault(&io), StatusCode::IoError);

    let wrapped = ConfigError { source: io };
    // The leaf row outranks the io::Error row in the chain.
    assert_eq!(get_status_code_for_fault(&wrapped), StatusCode::FromUtf8Error);
    assert_eq!(causes(&wrapped).count(), 2);
}

#[test]
fn status_or_from_parse_failure() {
    let r: Result<i64, _> = "12z".parse::<i64>();
    let s = match r {
        Ok(v) => StatusOr::new(v),
        Err(e) => StatusOr::from_fault(&e, false),
    };
    assert_eq!(s.status().to_string(), "PARSE_INT_ERROR: invalid digit found in string");
}
