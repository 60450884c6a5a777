//! # Rank Oracle Trait
//!
//! The boundary between the flattening pipeline and whatever computes
//! rank. Implementations:
//!
//! - [`ProcessOracle`](crate::process::ProcessOracle) pipes the matrix to
//!   an external executable.
//! - [`EliminationOracle`](crate::elimination::EliminationOracle) runs
//!   sparse elimination in-process.
//! - [`MockRankOracle`](crate::mock::MockRankOracle) returns a scripted
//!   answer for tests.
//!
//! Callers must not assume an oracle is available; rank is best-effort
//! instrumentation on top of the flattening itself.

use crate::error::OracleError;
use crate::sms::SmsMatrix;

/// Computes the rank of a sparse integer matrix, exactly over Q unless
/// [`modulus`](RankOracle::modulus) names a prime.
///
/// The trait is object safe so the CLI can choose a backend at runtime.
pub trait RankOracle: Send + Sync {
    /// Short backend name for logs and reports.
    fn name(&self) -> &str;

    /// Rank of `matrix`.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Unavailable`] if the backend cannot be reached.
    /// - [`OracleError::Protocol`] if its answer is not an integer.
    /// - [`OracleError::Timeout`] if it does not answer in time.
    fn rank(&self, matrix: &SmsMatrix) -> Result<usize, OracleError>;

    /// The prime the rank is computed modulo, or `None` for an exact rank.
    ///
    /// A modular rank is a lower bound on the rank over Q.
    fn modulus(&self) -> Option<u64> {
        None
    }

    /// Whether answers are exact ranks over Q.
    fn is_exact(&self) -> bool {
        self.modulus().is_none()
    }
}
