//! # Antisymmetrization Operator
//!
//! The map `Λ^y A ⊗ A → Λ^{y+1} A` sending `e_S ⊗ e_j` to `±e_{S ∪ {j}}`,
//! as a sparse matrix of shape `(C(x, y+1), C(x, y) · x)`.
//!
//! Column `rank(S) · x + j` holds a single `(-1)^pos` in row
//! `rank(S ∪ {j})`, where `pos` is the position of `j` in the sorted
//! union. Columns with `j ∈ S` are empty.

use sprs::{CsMat, TriMat};

use koszul_core::{binomial, checked_dim, combinations, rank_of, KoszulError};

use crate::bracket::position_sign;

/// Build the antisymmetrization operator `a(x, y)`.
///
/// # Errors
///
/// Returns [`KoszulError::InvalidParameter`] unless `y < x`, and
/// [`KoszulError::Overflow`] if a dimension does not fit in `usize`.
pub fn antisymmetrization_operator(x: usize, y: usize) -> Result<CsMat<i64>, KoszulError> {
    if y >= x {
        return Err(KoszulError::InvalidParameter(format!(
            "antisymmetrization needs y < x, got x = {x}, y = {y}"
        )));
    }
    let rows = binomial(x, y + 1)?;
    let source = binomial(x, y)?;
    let cols = checked_dim("antisymmetrization columns", &[source, x])?;

    // Each y-subset contributes one entry per element outside it.
    let mut tri = TriMat::with_capacity((rows, cols), source * (x - y));
    for (s_rank, subset) in combinations(x, y).enumerate() {
        let mut union = Vec::with_capacity(y + 1);
        for j in 0..x {
            let pos = subset.partition_point(|&s| s < j);
            if subset.get(pos) == Some(&j) {
                continue;
            }
            union.clear();
            union.extend_from_slice(&subset[..pos]);
            union.push(j);
            union.extend_from_slice(&subset[pos..]);
            let row = rank_of(x, y + 1, &union)?;
            tri.add_triplet(row, s_rank * x + j, position_sign(pos));
        }
    }
    Ok(tri.to_csr())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense(m: &CsMat<i64>) -> Vec<Vec<i64>> {
        let mut out = vec![vec![0; m.cols()]; m.rows()];
        for (&v, (r, c)) in m.iter() {
            out[r][c] += v;
        }
        out
    }

    #[test]
    fn degree_zero_is_identity() {
        let a = antisymmetrization_operator(3, 0).unwrap();
        assert_eq!(a.shape(), (3, 3));
        assert_eq!(dense(&a), vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]]);
    }

    #[test]
    fn degree_one_wedge_signs() {
        // Rows: {0,1}, {0,2}, {1,2}. Columns: (S, j) = ({0},0..3), ({1},0..3), ({2},0..3).
        let a = antisymmetrization_operator(3, 1).unwrap();
        assert_eq!(a.shape(), (3, 9));
        let d = dense(&a);
        // {0,1}: j = 1 lands at position 1 of (0,1), j = 0 at position 0.
        assert_eq!(d[0], vec![0, -1, 0, 1, 0, 0, 0, 0, 0]);
        assert_eq!(d[1], vec![0, 0, -1, 0, 0, 0, 1, 0, 0]);
        assert_eq!(d[2], vec![0, 0, 0, 0, 0, -1, 0, 1, 0]);
    }

    #[test]
    fn top_degree_has_single_row() {
        let a = antisymmetrization_operator(4, 3).unwrap();
        assert_eq!(a.shape(), (1, 16));
        assert_eq!(a.nnz(), 4);
    }

    #[test]
    fn rejects_y_not_below_x() {
        assert!(antisymmetrization_operator(3, 3).is_err());
        assert!(antisymmetrization_operator(0, 0).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every column holds at most one ±1, and exactly one iff j ∉ S.
        #[test]
        fn one_signed_entry_per_free_column((x, y) in (1usize..8).prop_flat_map(|x| (Just(x), 0..x))) {
            let a = antisymmetrization_operator(x, y).unwrap();
            prop_assert_eq!(a.shape(), (binomial(x, y + 1).unwrap(), binomial(x, y).unwrap() * x));
            prop_assert_eq!(a.nnz(), binomial(x, y).unwrap() * (x - y));

            let mut per_column = vec![0usize; a.cols()];
            for (&v, (_, c)) in a.iter() {
                prop_assert!(v == 1 || v == -1);
                per_column[c] += 1;
            }
            for (s_rank, subset) in combinations(x, y).enumerate() {
                for j in 0..x {
                    let expected = usize::from(!subset.contains(&j));
                    prop_assert_eq!(per_column[s_rank * x + j], expected);
                }
            }
        }
    }
}
