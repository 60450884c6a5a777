//! # Elementary Basis Mapper
//!
//! The basis of gl(n) is the set of elementary matrices `E_{row,col}`,
//! flattened row-major: `flat = n * row + col`. The sl(n) basis used by
//! the structure tensor is the prefix `[0, m)` with `m = n² - 1`, which
//! leaves out exactly one generator, `E_{n-1,n-1}` at flat index `n² - 1`.
//!
//! A diagonal flat index `n * k + k` with `k < n - 1` stands for the
//! Cartan element `E_{k,k} - E_{k+1,k+1}` whenever it is the second
//! argument of a bracket (see `koszul_tensor::bracket::bracket_diag`).

use serde::{Deserialize, Serialize};

use crate::error::KoszulError;

/// An elementary generator `E_{row,col}`.
///
/// Coordinates are not bounded by `n` at construction: the diagonal
/// shift in the bracket evaluator may form `E_{n,n}`, which never
/// matches any real generator and therefore never contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Generator {
    /// Row label.
    pub row: usize,
    /// Column label.
    pub col: usize,
}

impl Generator {
    /// Create `E_{row,col}`.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether this is a diagonal-type generator `E_{k,k}`.
    pub fn is_diagonal(&self) -> bool {
        self.row == self.col
    }

    /// The generator shifted one step down the diagonal, `E_{row+1,col+1}`.
    pub fn shifted(&self) -> Self {
        Self::new(self.row + 1, self.col + 1)
    }
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E[{},{}]", self.row, self.col)
    }
}

/// The Lie algebra sl(n) in its elementary-matrix basis.
///
/// Immutable context threaded through every mapper, bracket, and builder
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlAlgebra {
    n: usize,
}

impl SlAlgebra {
    /// Create the context for sl(n).
    ///
    /// # Errors
    ///
    /// Returns [`KoszulError::InvalidParameter`] if `n < 2`, and
    /// [`KoszulError::Overflow`] if `n²` does not fit in `usize`.
    pub fn new(n: usize) -> Result<Self, KoszulError> {
        if n < 2 {
            return Err(KoszulError::InvalidParameter(format!(
                "n must be at least 2, got {n}"
            )));
        }
        n.checked_mul(n)
            .ok_or_else(|| KoszulError::Overflow(format!("{n}²")))?;
        Ok(Self { n })
    }

    /// The matrix size `n`.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Dimension `m = n² - 1` of sl(n).
    pub fn dim(&self) -> usize {
        self.n * self.n - 1
    }

    /// Map a flat index in `[0, n²)` to its generator.
    ///
    /// # Errors
    ///
    /// Returns [`KoszulError::InvalidParameter`] if `flat >= n²`.
    pub fn to_pair(&self, flat: usize) -> Result<Generator, KoszulError> {
        if flat >= self.n * self.n {
            return Err(KoszulError::InvalidParameter(format!(
                "flat index {flat} outside gl({}) basis of size {}",
                self.n,
                self.n * self.n
            )));
        }
        Ok(Generator::new(flat / self.n, flat % self.n))
    }

    /// Map a generator to its flat index; a missing generator stays missing.
    ///
    /// The result is not range-checked: callers compare it against
    /// [`dim`](Self::dim) before using it as a subscript.
    pub fn to_flat(&self, generator: Option<Generator>) -> Option<usize> {
        generator.map(|g| self.n * g.row + g.col)
    }

    /// The single gl(n) generator left out of the sl(n) basis.
    pub fn excluded_generator(&self) -> Generator {
        Generator::new(self.n - 1, self.n - 1)
    }

    /// Whether `flat` addresses an sl(n) basis element.
    pub fn contains(&self, flat: usize) -> bool {
        flat < self.dim()
    }
}
