//! # Combinatorial Indexer
//!
//! Bijections between strictly increasing k-subsets of `{0, …, x-1}` and
//! their 0-based position in lexicographic order, plus an enumerator that
//! walks the subsets in that same order.
//!
//! The antisymmetrization operator indexes rows by (y+1)-subsets and
//! columns by y-subsets, so [`rank_of`] must agree with [`combinations`]
//! for every `k` simultaneously. Both are defined by the same ordering:
//! `(0,1) < (0,2) < … < (0,x-1) < (1,2) < …`.

use crate::error::KoszulError;

/// Binomial coefficient `C(n, k)` with overflow detection.
///
/// Returns `Ok(0)` when `k > n`.
pub fn binomial(n: usize, k: usize) -> Result<usize, KoszulError> {
    if k > n {
        return Ok(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) is divisible by (i + 1) at every step.
        acc = acc
            .checked_mul((n - i) as u128)
            .ok_or_else(|| KoszulError::Overflow(format!("C({n}, {k})")))?
            / (i as u128 + 1);
    }
    usize::try_from(acc).map_err(|_| KoszulError::Overflow(format!("C({n}, {k})")))
}

/// Position of `subset` among all k-subsets of `{0, …, x-1}` in
/// lexicographic order, where `k = subset.len()`.
///
/// # Errors
///
/// Returns [`KoszulError::InvalidParameter`] if `subset` has the wrong
/// length, is not strictly increasing, or has an element `>= x`.
pub fn rank_of(x: usize, k: usize, subset: &[usize]) -> Result<usize, KoszulError> {
    validate_subset(x, k, subset)?;
    let mut rank = 0usize;
    let mut next = 0usize;
    for (i, &s) in subset.iter().enumerate() {
        // Count every subset that agrees on the first i entries but has a
        // smaller i-th entry.
        for v in next..s {
            rank = rank
                .checked_add(binomial(x - 1 - v, k - 1 - i)?)
                .ok_or_else(|| KoszulError::Overflow(format!("rank in C({x}, {k})")))?;
        }
        next = s + 1;
    }
    Ok(rank)
}

/// Inverse of [`rank_of`]: the k-subset at position `index`.
///
/// # Errors
///
/// Returns [`KoszulError::InvalidParameter`] if `k > x` or
/// `index >= C(x, k)`.
pub fn subset_of(x: usize, k: usize, index: usize) -> Result<Vec<usize>, KoszulError> {
    let total = binomial(x, k)?;
    if index >= total {
        return Err(KoszulError::InvalidParameter(format!(
            "subset index {index} out of range for C({x}, {k}) = {total}"
        )));
    }
    let mut remaining = index;
    let mut subset = Vec::with_capacity(k);
    let mut v = 0usize;
    for i in 0..k {
        loop {
            let block = binomial(x - 1 - v, k - 1 - i)?;
            if remaining < block {
                break;
            }
            remaining -= block;
            v += 1;
        }
        subset.push(v);
        v += 1;
    }
    Ok(subset)
}

fn validate_subset(x: usize, k: usize, subset: &[usize]) -> Result<(), KoszulError> {
    if subset.len() != k {
        return Err(KoszulError::InvalidParameter(format!(
            "expected a {k}-subset, got {} elements",
            subset.len()
        )));
    }
    if subset.windows(2).any(|w| w[0] >= w[1]) {
        return Err(KoszulError::InvalidParameter(format!(
            "subset {subset:?} is not strictly increasing"
        )));
    }
    if let Some(&last) = subset.last() {
        if last >= x {
            return Err(KoszulError::InvalidParameter(format!(
                "subset element {last} outside index set of size {x}"
            )));
        }
    }
    Ok(())
}

/// Lexicographic enumerator of k-subsets of `{0, …, x-1}`.
///
/// The n-th item yielded has [`rank_of`] equal to n.
#[derive(Debug, Clone)]
pub struct Combinations {
    x: usize,
    current: Option<Vec<usize>>,
}

/// Enumerate k-subsets of `{0, …, x-1}` in lexicographic order.
///
/// `k = 0` yields one empty subset; `k > x` yields nothing.
pub fn combinations(x: usize, k: usize) -> Combinations {
    let current = if k <= x { Some((0..k).collect()) } else { None };
    Combinations { x, current }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let out = self.current.take()?;
        let k = out.len();
        let mut succ = out.clone();
        // Rightmost slot that can still be incremented.
        let slot = (0..k).rev().find(|&i| succ[i] < self.x - k + i);
        if let Some(i) = slot {
            succ[i] += 1;
            for j in i + 1..k {
                succ[j] = succ[j - 1] + 1;
            }
            self.current = Some(succ);
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomial_small_values() {
        assert_eq!(binomial(0, 0).unwrap(), 1);
        assert_eq!(binomial(5, 0).unwrap(), 1);
        assert_eq!(binomial(5, 2).unwrap(), 10);
        assert_eq!(binomial(8, 3).unwrap(), 56);
        assert_eq!(binomial(3, 4).unwrap(), 0);
        assert_eq!(binomial(62, 31).unwrap(), 465_428_353_255_261_088);
    }

    #[test]
    fn binomial_overflow_is_reported() {
        assert!(matches!(
            binomial(200, 100),
            Err(KoszulError::Overflow(_))
        ));
    }

    #[test]
    fn enumeration_is_lexicographic() {
        let all: Vec<Vec<usize>> = combinations(4, 2).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    fn enumeration_edge_cases() {
        assert_eq!(combinations(3, 0).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(combinations(3, 3).collect::<Vec<_>>(), vec![vec![0, 1, 2]]);
        assert_eq!(combinations(2, 3).count(), 0);
        assert_eq!(combinations(0, 0).count(), 1);
    }

    #[test]
    fn rank_matches_enumeration_index() {
        for x in 0..7 {
            for k in 0..=x {
                for (i, s) in combinations(x, k).enumerate() {
                    assert_eq!(rank_of(x, k, &s).unwrap(), i, "x={x} k={k} s={s:?}");
                }
                assert_eq!(combinations(x, k).count(), binomial(x, k).unwrap());
            }
        }
    }

    #[test]
    fn rank_rejects_malformed_subsets() {
        assert!(rank_of(4, 2, &[1]).is_err());
        assert!(rank_of(4, 2, &[2, 1]).is_err());
        assert!(rank_of(4, 2, &[1, 1]).is_err());
        assert!(rank_of(4, 2, &[1, 4]).is_err());
    }

    #[test]
    fn subset_of_rejects_out_of_range_index() {
        assert!(subset_of(4, 2, 6).is_err());
        assert_eq!(subset_of(4, 2, 5).unwrap(), vec![2, 3]);
        assert_eq!(subset_of(4, 0, 0).unwrap(), Vec::<usize>::new());
    }
}
