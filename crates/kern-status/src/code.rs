//! Status codes carried by [`Status`](crate::Status).
//!
//! # Code Ranges
//!
//! The `i32` code space is partitioned into three bands:
//!
//! | Range       | Purpose                                                 |
//! |-------------|---------------------------------------------------------|
//! | `0..=16`     | Canonical outcome codes (`OK` is the only success code) |
//! | `-1`        | Custom codes (`ZERO_DIVISION`)                          |
//! | `100+`      | Standard-library fault categories, see [`crate::fault`] |
//!
//! The fault band exists purely for best-effort classification when a caught
//! error or panic is converted into a `Status`. Domain code should return the
//! canonical codes.

use core::fmt;

macro_rules! status_codes {
    ($( $(#[$doc:meta])* $variant:ident = $value:literal => $name:literal, )*) => {
        /// Closed set of outcome categories.
        #[repr(i32)]
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum StatusCode {
            $( $(#[$doc])* $variant = $value, )*
        }

        impl StatusCode {
            /// Every code in declaration order.
            pub const ALL: &'static [StatusCode] = &[ $( StatusCode::$variant, )* ];

            /// Upper-snake name, e.g. `"INVALID_ARGUMENT"`.
            pub const fn name(self) -> &'static str {
                match self {
                    $( StatusCode::$variant => $name, )*
                }
            }
        }

        impl TryFrom<i32> for StatusCode {
            type Error = i32;

            /// Returns the unknown integer back on failure.
            fn try_from(value: i32) -> Result<Self, i32> {
                match value {
                    $( $value => Ok(StatusCode::$variant), )*
                    other => Err(other),
                }
            }
        }
    };
}

status_codes! {
    // ── Canonical codes ───────────────────────────────────────────
    /// Not an error; returned on success.
    #[default]
    Ok = 0 => "OK",
    Cancelled = 1 => "CANCELLED",
    Unknown = 2 => "UNKNOWN",
    InvalidArgument = 3 => "INVALID_ARGUMENT",
    DeadlineExceeded = 4 => "DEADLINE_EXCEEDED",
    NotFound = 5 => "NOT_FOUND",
    AlreadyExists = 6 => "ALREADY_EXISTS",
    PermissionDenied = 7 => "PERMISSION_DENIED",
    ResourceExhausted = 8 => "RESOURCE_EXHAUSTED",
    FailedPrecondition = 9 => "FAILED_PRECONDITION",
    Aborted = 10 => "ABORTED",
    OutOfRange = 11 => "OUT_OF_RANGE",
    Unimplemented = 12 => "UNIMPLEMENTED",
    Internal = 13 => "INTERNAL",
    Unavailable = 14 => "UNAVAILABLE",
    DataLoss = 15 => "DATA_LOSS",
    Unauthenticated = 16 => "UNAUTHENTICATED",

    // ── Custom codes ──────────────────────────────────────────────
    /// Division by zero detected by application code.
    ZeroDivision = -1 => "ZERO_DIVISION",

    // ── I/O faults (io::ErrorKind) ────────────────────────────────
    IoError = 100 => "IO_ERROR",
    FileNotFoundError = 101 => "FILE_NOT_FOUND_ERROR",
    PermissionError = 102 => "PERMISSION_ERROR",
    ConnectionRefusedError = 103 => "CONNECTION_REFUSED_ERROR",
    ConnectionResetError = 104 => "CONNECTION_RESET_ERROR",
    ConnectionAbortedError = 105 => "CONNECTION_ABORTED_ERROR",
    NotConnectedError = 106 => "NOT_CONNECTED_ERROR",
    AddrInUseError = 107 => "ADDR_IN_USE_ERROR",
    AddrNotAvailableError = 108 => "ADDR_NOT_AVAILABLE_ERROR",
    BrokenPipeError = 109 => "BROKEN_PIPE_ERROR",
    FileExistsError = 110 => "FILE_EXISTS_ERROR",
    WouldBlockError = 111 => "WOULD_BLOCK_ERROR",
    InvalidInputError = 112 => "INVALID_INPUT_ERROR",
    InvalidDataError = 113 => "INVALID_DATA_ERROR",
    TimeoutError = 114 => "TIMEOUT_ERROR",
    WriteZeroError = 115 => "WRITE_ZERO_ERROR",
    InterruptedError = 116 => "INTERRUPTED_ERROR",
    UnsupportedError = 117 => "UNSUPPORTED_ERROR",
    EofError = 118 => "EOF_ERROR",
    MemoryError = 119 => "MEMORY_ERROR",

    // ── Parse / conversion faults ─────────────────────────────────
    ParseIntError = 120 => "PARSE_INT_ERROR",
    ParseFloatError = 121 => "PARSE_FLOAT_ERROR",
    ParseBoolError = 122 => "PARSE_BOOL_ERROR",
    ParseCharError = 123 => "PARSE_CHAR_ERROR",
    AddrParseError = 124 => "ADDR_PARSE_ERROR",
    Utf8Error = 125 => "UTF8_ERROR",
    FromUtf8Error = 126 => "FROM_UTF8_ERROR",
    TryFromIntError = 127 => "TRY_FROM_INT_ERROR",
    FmtError = 128 => "FMT_ERROR",

    // ── Runtime faults ────────────────────────────────────────────
    RecvError = 129 => "RECV_ERROR",
    RecvTimeoutError = 130 => "RECV_TIMEOUT_ERROR",
    TryRecvError = 131 => "TRY_RECV_ERROR",
    SystemTimeError = 132 => "SYSTEM_TIME_ERROR",
    NulError = 133 => "NUL_ERROR",
    EnvVarError = 134 => "ENV_VAR_ERROR",
    /// A panic caught by [`catch_status`](crate::catch_status).
    Panic = 135 => "PANIC",
}

impl StatusCode {
    /// Integer tag of this code.
    #[inline]
    pub const fn value(self) -> i32 {
        self as i32
    }

    /// True only for [`StatusCode::Ok`].
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, StatusCode::Ok)
    }

    /// True for codes in the standard-library fault band (`>= 100`).
    #[inline]
    pub const fn is_fault(self) -> bool {
        self.value() >= 100
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
