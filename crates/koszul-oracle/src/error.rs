//! # Oracle Error Types
//!
//! Structured errors for the interchange format and for rank oracles.
//! Format errors carry the 1-based line number of the offending input.

use std::time::Duration;

use thiserror::Error;

/// Errors parsing or building a matrix in the interchange format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmsError {
    /// The input had no header line.
    #[error("missing header line")]
    MissingHeader,

    /// The header is not `<rows> <cols> M`.
    #[error("line {line}: malformed header {content:?}")]
    BadHeader {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// An entry line is not `<row> <col> <value>`.
    #[error("line {line}: malformed entry {content:?}")]
    BadEntry {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// An entry lies outside the declared shape.
    #[error("entry ({row}, {col}) outside {rows}x{cols} matrix")]
    OutOfRange {
        /// 1-based row of the entry.
        row: usize,
        /// 1-based column of the entry.
        col: usize,
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        cols: usize,
    },

    /// Summing duplicate entries overflowed `i64`.
    #[error("entry ({row}, {col}) overflows i64")]
    ValueOverflow {
        /// 1-based row of the entry.
        row: usize,
        /// 1-based column of the entry.
        col: usize,
    },

    /// The input ended before the `0 0 0` terminator.
    #[error("missing 0 0 0 terminator")]
    MissingTerminator,

    /// Non-blank content followed the terminator.
    #[error("line {line}: data after terminator")]
    TrailingData {
        /// 1-based line number.
        line: usize,
    },
}

/// Errors from a rank oracle.
#[derive(Error, Debug)]
pub enum OracleError {
    /// The external rank tool could not be started.
    #[error("rank oracle {program} unavailable: {source}")]
    Unavailable {
        /// The configured executable.
        program: String,
        /// The spawn failure.
        #[source]
        source: std::io::Error,
    },

    /// The oracle's output could not be interpreted as a rank.
    #[error("rank oracle protocol error: {0}")]
    Protocol(String),

    /// The oracle did not finish within the configured timeout.
    #[error("rank oracle timed out after {0:?}")]
    Timeout(Duration),

    /// The oracle exited unsuccessfully.
    #[error("rank oracle exited with {status}: {stderr}")]
    Failed {
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// An elimination modulus is not a prime below 2^32.
    #[error("elimination modulus {0} is not a prime below 2^32")]
    InvalidModulus(u64),

    /// The matrix could not be represented in the interchange format.
    #[error("interchange format error: {0}")]
    Format(#[from] SmsError),

    /// I/O error while talking to the oracle.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
