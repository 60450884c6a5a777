//! # koszul-core — Foundational Types for Koszul Flattening Analysis
//!
//! This crate is the leaf of the workspace DAG. It defines the index
//! bookkeeping every other crate relies on: binomial coefficients, the
//! lexicographic ranking of k-subsets, the elementary-matrix basis of
//! sl(n), and the validated parameters of a single `(n, p)` run.
//!
//! ## Key Design Principles
//!
//! 1. **No numeric sentinels.** A missing generator is `None`, never `-1`
//!    or `0`. [`SlAlgebra::to_flat`] maps `None` to `None`.
//!
//! 2. **Explicit context.** [`SlAlgebra`] carries `n` and `m = n² - 1`;
//!    nothing in the workspace reads a global dimension.
//!
//! 3. **Checked arithmetic.** Binomials and dimension products go through
//!    checked multiplication and surface [`KoszulError::Overflow`] instead
//!    of wrapping.
//!
//! 4. **Fail fast on size.** [`Limits`] bounds the dense tensor and every
//!    operator dimension before any allocation happens.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `koszul-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod basis;
pub mod combinatorics;
pub mod error;
pub mod params;

// Re-export primary types for ergonomic imports.
pub use basis::{Generator, SlAlgebra};
pub use combinatorics::{binomial, combinations, rank_of, subset_of, Combinations};
pub use error::KoszulError;
pub use params::{checked_dim, FlatteningParams, Limits};
