//! # koszul-oracle — Rank Oracles
//!
//! Everything needed to ask "what is the rank of this sparse integer
//! matrix?" without tying the flattening pipeline to a particular solver.
//!
//! ## Architecture
//!
//! - **Format** (`sms.rs`): the `<rows> <cols> M` / 1-based triplet /
//!   `0 0 0` interchange text read by LinBox-style rank tools.
//! - **Trait** (`traits.rs`): [`RankOracle`], object safe, chosen at runtime.
//! - **Process** (`process.rs`): streams the matrix to an external
//!   executable with a wall-clock timeout.
//! - **Elimination** (`elimination.rs`): in-process sparse elimination
//!   modulo a large prime; a lower bound on the exact rank, labelled as
//!   such through [`RankOracle::modulus`].
//! - **Mock** (`mock.rs`): scripted answers for tests.
//!
//! ## Crate Policy
//!
//! - No dependency on the tensor crates; matrices arrive as [`SmsMatrix`]
//!   or `sprs::CsMat<i64>`.
//! - A missing or failing oracle is an error value, never a panic.

pub mod config;
pub mod elimination;
pub mod error;
pub mod mock;
pub mod process;
pub mod sms;
pub mod traits;

pub use config::{ConfigError, OracleConfig};
pub use elimination::{EliminationOracle, DEFAULT_PRIME};
pub use error::{OracleError, SmsError};
pub use mock::MockRankOracle;
pub use process::ProcessOracle;
pub use sms::SmsMatrix;
pub use traits::RankOracle;
