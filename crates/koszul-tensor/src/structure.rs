//! # Structure Tensor
//!
//! Dense `m × m × m` array of structure constants `T[i,j,k] = c_{ij}^k`
//! of sl(n) in the elementary basis, where `[e_i, e_j] = Σ_k c_{ij}^k e_k`.
//!
//! ## Construction
//!
//! For every ordered pair of basis indices the bracket evaluator is run on
//! the single-slot tuple `(e_j)`; each present term at list position `k`
//! adds `(-1)^k` to `T[i, j, flat(term)]`. Terms whose flat index falls
//! outside `[0, m)` are dropped. The elementary ordering guarantees the
//! only such term is `E_{n-1,n-1}`; anything else aborts the build with
//! [`KoszulError::Truncation`].
//!
//! ## Antisymmetry
//!
//! `T[i,j,:] = -T[j,i,:]` holds whenever neither `e_i` nor `e_j` is
//! diagonal. A diagonal index is doubled into a Cartan element only as
//! the second bracket argument, so pairs involving one are expected to
//! show up in [`StructureTensor::antisymmetry_violations`].

use serde::Serialize;

use koszul_core::{KoszulError, Limits, SlAlgebra};

use crate::bracket::{bracket_tuple, position_sign};

/// Counters collected while building a [`StructureTensor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Number of bracket evaluations (`m²`).
    pub bracket_evaluations: usize,
    /// Signed terms accumulated into the tensor.
    pub accumulated_terms: usize,
    /// Terms dropped because they landed on `E_{n-1,n-1}`.
    pub dropped_terms: usize,
}

/// Dense structure tensor of sl(n), stored row-major as `[i][j][k]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureTensor {
    algebra: SlAlgebra,
    data: Vec<i64>,
    stats: BuildStats,
}

impl StructureTensor {
    /// Build the structure tensor of `algebra`.
    ///
    /// # Errors
    ///
    /// - [`KoszulError::ResourceLimit`] if `m³` exceeds `limits`.
    /// - [`KoszulError::Truncation`] if a dropped term is not `E_{n-1,n-1}`.
    pub fn build(algebra: SlAlgebra, limits: &Limits) -> Result<Self, KoszulError> {
        let m = algebra.dim();
        let cells = koszul_core::checked_dim("structure tensor", &[m, m, m])?;
        limits.check_tensor(cells)?;

        let excluded = algebra.to_flat(Some(algebra.excluded_generator()));
        let mut data = vec![0i64; cells];
        let mut stats = BuildStats::default();

        for i in 0..m {
            let e = algebra.to_pair(i)?;
            for j in 0..m {
                let a = algebra.to_pair(j)?;
                stats.bracket_evaluations += 1;
                let terms = bracket_tuple(e, std::slice::from_ref(&a));
                for (position, term) in terms.into_iter().enumerate() {
                    let flat = match algebra.to_flat(term.and_then(|t| t.first().copied())) {
                        Some(flat) => flat,
                        None => continue,
                    };
                    if !algebra.contains(flat) {
                        if Some(flat) != excluded {
                            return Err(KoszulError::Truncation {
                                flat,
                                n: algebra.n(),
                            });
                        }
                        stats.dropped_terms += 1;
                        continue;
                    }
                    data[(i * m + j) * m + flat] += position_sign(position);
                    stats.accumulated_terms += 1;
                }
            }
        }

        tracing::debug!(
            n = algebra.n(),
            m,
            evaluations = stats.bracket_evaluations,
            accumulated = stats.accumulated_terms,
            dropped = stats.dropped_terms,
            "structure tensor built"
        );

        Ok(Self {
            algebra,
            data,
            stats,
        })
    }

    /// The algebra this tensor describes.
    pub fn algebra(&self) -> SlAlgebra {
        self.algebra
    }

    /// Side length `m`.
    pub fn dim(&self) -> usize {
        self.algebra.dim()
    }

    /// Counters recorded during the build.
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// `T[i, j, k]`.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= m`.
    pub fn get(&self, i: usize, j: usize, k: usize) -> i64 {
        let m = self.dim();
        assert!(i < m && j < m && k < m, "index ({i},{j},{k}) out of range");
        self.data[(i * m + j) * m + k]
    }

    /// The coefficient vector `T[i, j, :]` of `[e_i, e_j]`.
    pub fn fiber(&self, i: usize, j: usize) -> &[i64] {
        let m = self.dim();
        let start = (i * m + j) * m;
        &self.data[start..start + m]
    }

    /// All nonzero entries as `(i, j, k, value)`, in row-major order.
    pub fn nonzeros(&self) -> impl Iterator<Item = (usize, usize, usize, i64)> + '_ {
        let m = self.dim();
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(move |(idx, &v)| (idx / (m * m), (idx / m) % m, idx % m, v))
    }

    /// Number of nonzero entries.
    pub fn nnz(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Ordered pairs `(i, j)` with `i < j` where `T[i,j,:] != -T[j,i,:]`.
    pub fn antisymmetry_violations(&self) -> Vec<(usize, usize)> {
        let m = self.dim();
        let mut out = Vec::new();
        for i in 0..m {
            for j in i + 1..m {
                let forward = self.fiber(i, j);
                let backward = self.fiber(j, i);
                if forward.iter().zip(backward).any(|(f, b)| *f != -*b) {
                    out.push((i, j));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sl(n: usize) -> StructureTensor {
        StructureTensor::build(SlAlgebra::new(n).unwrap(), &Limits::default()).unwrap()
    }

    // sl(2) basis: 0 = H (E00), 1 = E (E01), 2 = F (E10).
    const H: usize = 0;
    const E: usize = 1;
    const F: usize = 2;

    #[test]
    fn sl2_e_f_bracket_is_h() {
        let t = sl(2);
        assert_eq!(t.fiber(E, F), &[1, 0, 0]);
        assert_eq!(t.fiber(F, E), &[-1, 0, 0]);
    }

    #[test]
    fn sl2_cartan_weights_as_second_argument() {
        let t = sl(2);
        // [E, H] = -2E, i.e. [H, E] = 2E.
        assert_eq!(t.fiber(E, H), &[0, -2, 0]);
        // [F, H] = 2F, i.e. [H, F] = -2F.
        assert_eq!(t.fiber(F, H), &[0, 0, 2]);
        assert_eq!(t.fiber(H, H), &[0, 0, 0]);
    }

    #[test]
    fn sl2_diagonal_first_argument_acts_as_e00() {
        let t = sl(2);
        assert_eq!(t.fiber(H, E), &[0, 1, 0]);
        assert_eq!(t.fiber(H, F), &[0, 0, -1]);
        assert_eq!(t.antisymmetry_violations(), vec![(H, E), (H, F)]);
    }

    #[test]
    fn sl2_stats() {
        let t = sl(2);
        let stats = t.stats();
        assert_eq!(stats.bracket_evaluations, 9);
        // [E, F] and [F, E] each drop their E11 term.
        assert_eq!(stats.dropped_terms, 2);
        assert_eq!(t.nnz(), 6);
    }

    #[test]
    fn off_diagonal_block_is_antisymmetric() {
        for n in 2..5 {
            let t = sl(n);
            let diagonal = |idx: usize| idx % (n + 1) == 0;
            for (i, j) in t.antisymmetry_violations() {
                assert!(
                    diagonal(i) || diagonal(j),
                    "n={n}: off-diagonal pair ({i},{j}) is not antisymmetric"
                );
            }
        }
    }

    #[test]
    fn entries_are_small_integers() {
        let t = sl(3);
        assert!(t.nonzeros().all(|(_, _, _, v)| (-2..=2).contains(&v)));
        assert_eq!(t.nonzeros().count(), t.nnz());
    }

    #[test]
    fn nonzeros_decode_indices() {
        let t = sl(2);
        let entries: Vec<_> = t.nonzeros().collect();
        assert!(entries.contains(&(E, F, H, 1)));
        assert!(entries.contains(&(E, H, E, -2)));
        for (i, j, k, v) in entries {
            assert_eq!(t.get(i, j, k), v);
        }
    }

    #[test]
    fn tensor_limit_fails_fast() {
        let limits = Limits {
            max_tensor_entries: 26,
            ..Limits::default()
        };
        let err = StructureTensor::build(SlAlgebra::new(2).unwrap(), &limits).unwrap_err();
        assert!(matches!(err, KoszulError::ResourceLimit { requested: 27, .. }));
    }
}
