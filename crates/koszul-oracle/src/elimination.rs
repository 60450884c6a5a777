//! # In-Process Sparse Elimination
//!
//! Row-by-row sparse Gaussian elimination over the prime field
//! GF(2^31 - 1). Each incoming row is reduced against the pivot rows
//! collected so far; a row that survives contributes a new pivot.
//!
//! ## Exactness
//!
//! Rank over GF(p) never exceeds rank over Q, and equals it unless `p`
//! divides some nonzero maximal minor. The flattening matrices carry small
//! integer entries, so for p = 2^31 - 1 a disagreement is not expected in
//! practice, but this backend is a lower bound, not a certificate. Use
//! [`ProcessOracle`](crate::process::ProcessOracle) with an exact rational
//! tool when a proof-grade rank is required.

use std::collections::HashMap;

use crate::error::OracleError;
use crate::sms::SmsMatrix;
use crate::traits::RankOracle;

/// The Mersenne prime 2^31 - 1.
pub const DEFAULT_PRIME: u64 = 2_147_483_647;

type SparseRow = Vec<(usize, u64)>;

/// Rank oracle that eliminates modulo a prime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EliminationOracle {
    prime: u64,
}

impl Default for EliminationOracle {
    fn default() -> Self {
        Self {
            prime: DEFAULT_PRIME,
        }
    }
}

impl EliminationOracle {
    /// Eliminate modulo [`DEFAULT_PRIME`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Eliminate modulo `prime`.
    ///
    /// `prime` must be a prime below 2^32 so products fit in `u64`;
    /// anything else is [`OracleError::InvalidModulus`].
    pub fn with_prime(prime: u64) -> Result<Self, OracleError> {
        if prime < 2 || prime > u64::from(u32::MAX) || !is_prime(prime) {
            return Err(OracleError::InvalidModulus(prime));
        }
        Ok(Self { prime })
    }

    /// The field characteristic.
    pub fn prime(&self) -> u64 {
        self.prime
    }

    fn reduce_value(&self, v: i64) -> u64 {
        // prime <= u32::MAX, so the result fits u64.
        v.rem_euclid(self.prime as i64) as u64
    }

    fn inverse(&self, a: u64) -> u64 {
        pow_mod(a, self.prime - 2, self.prime)
    }

    /// `row - factor * pivot`, both sorted by column.
    fn axpy(&self, row: &[(usize, u64)], factor: u64, pivot: &[(usize, u64)]) -> SparseRow {
        let p = self.prime;
        let mut out = Vec::with_capacity(row.len() + pivot.len());
        let (mut i, mut j) = (0, 0);
        while i < row.len() || j < pivot.len() {
            match (row.get(i), pivot.get(j)) {
                (Some(&(ca, va)), Some(&(cb, vb))) if ca == cb => {
                    let v = (va + p - (factor * vb) % p) % p;
                    if v != 0 {
                        out.push((ca, v));
                    }
                    i += 1;
                    j += 1;
                }
                (Some(&(ca, va)), Some(&(cb, _))) if ca < cb => {
                    out.push((ca, va));
                    i += 1;
                }
                (Some(&(ca, va)), None) => {
                    out.push((ca, va));
                    i += 1;
                }
                (_, Some(&(cb, vb))) => {
                    out.push((cb, (p - (factor * vb) % p) % p));
                    j += 1;
                }
                (None, None) => break,
            }
        }
        out
    }

    /// Rank of `matrix` over GF(prime).
    pub fn rank_mod_p(&self, matrix: &SmsMatrix) -> usize {
        let mut rows: Vec<SparseRow> = vec![Vec::new(); matrix.rows()];
        for &(r, c, v) in matrix.entries() {
            let v = self.reduce_value(v);
            if v != 0 {
                rows[r].push((c, v));
            }
        }

        // pivot column -> row normalized to a leading 1
        let mut pivots: HashMap<usize, SparseRow> = HashMap::new();
        for mut row in rows {
            while let Some(&(lead, value)) = row.first() {
                match pivots.get(&lead) {
                    Some(pivot) => row = self.axpy(&row, value, pivot),
                    None => {
                        let inv = self.inverse(value);
                        for entry in &mut row {
                            entry.1 = entry.1 * inv % self.prime;
                        }
                        pivots.insert(lead, row);
                        break;
                    }
                }
            }
        }
        pivots.len()
    }
}

impl RankOracle for EliminationOracle {
    fn name(&self) -> &str {
        "elimination"
    }

    fn modulus(&self) -> Option<u64> {
        Some(self.prime)
    }

    fn rank(&self, matrix: &SmsMatrix) -> Result<usize, OracleError> {
        let rank = self.rank_mod_p(matrix);
        tracing::debug!(
            rows = matrix.rows(),
            cols = matrix.cols(),
            nnz = matrix.nnz(),
            rank,
            prime = self.prime,
            "sparse elimination finished"
        );
        Ok(rank)
    }
}

fn pow_mod(mut base: u64, mut exp: u64, modulus: u64) -> u64 {
    let mut acc = 1 % modulus;
    base %= modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc * base % modulus;
        }
        base = base * base % modulus;
        exp >>= 1;
    }
    acc
}

fn is_prime(n: u64) -> bool {
    if n < 4 {
        return n >= 2;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}
