//! # Lie Bracket Evaluator
//!
//! Commutators of elementary generators, expressed as short signed lists
//! of generators. The sign of an entry is carried by its position in the
//! list: even positions contribute `+1`, odd positions `-1`.
//!
//! ```text
//! [E_{e0,e1}, E_{a0,a1}] = δ(a0,e1)·E_{e0,a1} − δ(a1,e0)·E_{a0,e1}
//! ```
//!
//! When the second argument is diagonal, `E_{k,k}` stands for the Cartan
//! element `E_{k,k} − E_{k+1,k+1}`, so [`bracket_diag`] appends the
//! bracket with the shifted generator with its two terms swapped.

use koszul_core::Generator;

/// The two terms of `[E, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    /// `E_{e0,a1}` when `a0 == e1`.
    pub plus: Option<Generator>,
    /// `E_{a0,e1}` when `a1 == e0`.
    pub minus: Option<Generator>,
}

impl Bracket {
    /// Whether both terms are absent.
    pub fn is_zero(&self) -> bool {
        self.plus.is_none() && self.minus.is_none()
    }
}

/// Evaluate `[E, a]` for elementary generators.
///
/// Both terms may be present at once; for `e == a` diagonal they are
/// equal and cancel once the caller applies the position signs.
pub fn bracket(e: Generator, a: Generator) -> Bracket {
    Bracket {
        plus: (a.row == e.col).then(|| Generator::new(e.row, a.col)),
        minus: (a.col == e.row).then(|| Generator::new(a.row, e.col)),
    }
}

/// Signed terms of `[E, a]` with the Cartan doubling for diagonal `a`.
///
/// Returns `[plus, minus]` for off-diagonal `a` and
/// `[plus, minus, minus', plus']` for diagonal `a`, where the primed
/// terms come from `[E, a.shifted()]`. Position parity gives the sign.
pub fn bracket_diag(e: Generator, a: Generator) -> Vec<Option<Generator>> {
    let first = bracket(e, a);
    let mut terms = vec![first.plus, first.minus];
    if a.is_diagonal() {
        let second = bracket(e, a.shifted());
        terms.push(second.minus);
        terms.push(second.plus);
    }
    terms
}

/// Bracket `E` against each slot of a tuple of generators.
///
/// For every slot `k`, the terms of [`bracket_diag`]`(E, tuple[k])` are
/// listed in order; a present term yields a copy of `tuple` with slot `k`
/// replaced, an absent term yields `None`. Keeping absent placeholders
/// preserves list positions, and therefore signs, for the caller.
pub fn bracket_tuple(e: Generator, tuple: &[Generator]) -> Vec<Option<Vec<Generator>>> {
    let mut out = Vec::with_capacity(tuple.len() * 4);
    for (slot, &a) in tuple.iter().enumerate() {
        for term in bracket_diag(e, a) {
            out.push(term.map(|g| {
                let mut substituted = tuple.to_vec();
                substituted[slot] = g;
                substituted
            }));
        }
    }
    out
}

/// `(-1)^position` as an integer coefficient.
pub fn position_sign(position: usize) -> i64 {
    if position % 2 == 0 {
        1
    } else {
        -1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(r: usize, c: usize) -> Generator {
        Generator::new(r, c)
    }

    #[test]
    fn commuting_generators_give_zero() {
        // [E01, E01] = 0, [E01, E23] = 0.
        assert!(bracket(g(0, 1), g(0, 1)).is_zero());
        assert!(bracket(g(0, 1), g(2, 3)).is_zero());
    }

    #[test]
    fn plus_term_only() {
        // [E01, E12] = E02.
        let b = bracket(g(0, 1), g(1, 2));
        assert_eq!(b.plus, Some(g(0, 2)));
        assert_eq!(b.minus, None);
    }

    #[test]
    fn minus_term_only() {
        // [E12, E01] = -E02.
        let b = bracket(g(1, 2), g(0, 1));
        assert_eq!(b.plus, None);
        assert_eq!(b.minus, Some(g(0, 2)));
    }

    #[test]
    fn both_terms_for_transposed_pair() {
        // [E01, E10] = E00 - E11.
        let b = bracket(g(0, 1), g(1, 0));
        assert_eq!(b.plus, Some(g(0, 0)));
        assert_eq!(b.minus, Some(g(1, 1)));
    }

    #[test]
    fn diagonal_self_bracket_terms_coincide() {
        let b = bracket(g(1, 1), g(1, 1));
        assert_eq!(b.plus, b.minus);
        assert_eq!(b.plus, Some(g(1, 1)));
    }

    #[test]
    fn diag_extension_only_for_diagonal_argument() {
        assert_eq!(bracket_diag(g(0, 1), g(1, 2)).len(), 2);
        assert_eq!(bracket_diag(g(0, 1), g(1, 1)).len(), 4);
    }

    #[test]
    fn diag_extension_swaps_shifted_terms() {
        // [E01, E00 - E11] = -E01 - E01: minus at position 1, plus' at 3.
        let terms = bracket_diag(g(0, 1), g(0, 0));
        assert_eq!(terms, vec![None, Some(g(0, 1)), None, Some(g(0, 1))]);
        // [E10, E00 - E11] = E10 + E10: plus at 0, minus' at 2.
        let terms = bracket_diag(g(1, 0), g(0, 0));
        assert_eq!(terms, vec![Some(g(1, 0)), None, Some(g(1, 0)), None]);
    }

    #[test]
    fn last_diagonal_shift_never_contributes() {
        // a = E22 in gl(3) shifts to E33, which matches nothing.
        let terms = bracket_diag(g(1, 2), g(2, 2));
        assert_eq!(terms[2], None);
        assert_eq!(terms[3], None);
    }

    #[test]
    fn tuple_substitution_copies_per_term() {
        let tuple = [g(1, 0), g(0, 2)];
        let out = bracket_tuple(g(0, 1), &tuple);
        // Slot 0 is off-diagonal (2 terms), slot 1 off-diagonal (2 terms).
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], Some(vec![g(0, 0), g(0, 2)]));
        assert_eq!(out[1], Some(vec![g(1, 1), g(0, 2)]));
        assert_eq!(out[2], None);
        assert_eq!(out[3], None);
        // The input tuple is untouched.
        assert_eq!(tuple, [g(1, 0), g(0, 2)]);
    }

    #[test]
    fn tuple_keeps_absent_placeholders() {
        let out = bracket_tuple(g(0, 1), &[g(0, 0)]);
        assert_eq!(out, vec![None, Some(vec![g(0, 1)]), None, Some(vec![g(0, 1)])]);
    }

    #[test]
    fn signs_alternate() {
        assert_eq!(
            (0..4).map(position_sign).collect::<Vec<_>>(),
            vec![1, -1, 1, -1]
        );
    }
}
