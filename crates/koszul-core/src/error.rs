//! # Error Types
//!
//! Defines the error type shared by the index bookkeeping, the structure
//! tensor builder, and the flattening assembler. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Parameter errors are raised before any computation starts.
//! - Size errors carry the requested size and the configured limit.
//! - A dropped bracket term that is not the excluded diagonal generator
//!   is reported as [`KoszulError::Truncation`] rather than ignored.

use thiserror::Error;

/// Top-level error type for Koszul flattening computations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KoszulError {
    /// A caller-supplied parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A combinatorial size does not fit in `usize`.
    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    /// A requested allocation exceeds the configured limit.
    #[error("{what} requires {requested} but the limit is {limit}")]
    ResourceLimit {
        /// What was being sized (e.g. "dense structure tensor").
        what: String,
        /// The size that would have been allocated.
        requested: usize,
        /// The configured ceiling.
        limit: usize,
    },

    /// A bracket term outside the traceless basis was not E_{n-1,n-1}.
    #[error("bracket produced flat index {flat} outside sl({n}) that is not the excluded diagonal generator")]
    Truncation {
        /// The offending flat index.
        flat: usize,
        /// The algebra parameter.
        n: usize,
    },

    /// An assembled operator did not have the expected shape.
    #[error("shape mismatch: {0}")]
    Shape(String),
}
