//! # Run Parameters and Resource Limits
//!
//! [`FlatteningParams`] is the validated `(n, p)` pair a run is built
//! from. [`Limits`] caps the dense structure tensor and every sparse
//! operator dimension so that infeasible runs fail before allocating.
//!
//! ## Feasible range
//!
//! The dense tensor holds `m³` cells with `m = n² - 1`; the default cap of
//! 2^27 cells admits n ≤ 22. Operator dimensions grow as `C(m, p) · m²`;
//! the default cap of 2^24 admits every p for n ≤ 4 and p ≤ 4 for n = 5.

use serde::{Deserialize, Serialize};

use crate::basis::SlAlgebra;
use crate::error::KoszulError;

/// Default ceiling on dense structure tensor cells.
pub const DEFAULT_MAX_TENSOR_ENTRIES: usize = 1 << 27;

/// Default ceiling on any single sparse operator dimension.
pub const DEFAULT_MAX_DIMENSION: usize = 1 << 24;

/// Size ceilings checked before allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of cells in the dense `m × m × m` tensor.
    pub max_tensor_entries: usize,
    /// Maximum row or column count of any assembled operator.
    pub max_dimension: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_tensor_entries: DEFAULT_MAX_TENSOR_ENTRIES,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

impl Limits {
    /// Load limits from the environment, falling back to the defaults.
    ///
    /// Variables:
    /// - `KOSZUL_MAX_TENSOR_ENTRIES` (default: 134217728)
    /// - `KOSZUL_MAX_DIMENSION` (default: 16777216)
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_tensor_entries: env_usize("KOSZUL_MAX_TENSOR_ENTRIES")
                .unwrap_or(defaults.max_tensor_entries),
            max_dimension: env_usize("KOSZUL_MAX_DIMENSION").unwrap_or(defaults.max_dimension),
        }
    }

    /// Fail with [`KoszulError::ResourceLimit`] if `requested` tensor cells
    /// exceed the cap.
    pub fn check_tensor(&self, requested: usize) -> Result<(), KoszulError> {
        check(
            "dense structure tensor",
            requested,
            self.max_tensor_entries,
        )
    }

    /// Fail with [`KoszulError::ResourceLimit`] if an operator dimension
    /// exceeds the cap.
    pub fn check_dimension(&self, what: &str, requested: usize) -> Result<(), KoszulError> {
        check(what, requested, self.max_dimension)
    }
}

fn check(what: &str, requested: usize, limit: usize) -> Result<(), KoszulError> {
    if requested > limit {
        return Err(KoszulError::ResourceLimit {
            what: what.to_string(),
            requested,
            limit,
        });
    }
    Ok(())
}

fn env_usize(var: &str) -> Option<usize> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(var, value = %raw, "ignoring unparseable limit");
            None
        }
    }
}

/// Multiply dimension factors, reporting overflow by name.
pub fn checked_dim(what: &str, factors: &[usize]) -> Result<usize, KoszulError> {
    factors.iter().try_fold(1usize, |acc, &f| {
        acc.checked_mul(f)
            .ok_or_else(|| KoszulError::Overflow(format!("{what} dimension")))
    })
}

/// Validated parameters of one Koszul flattening run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlatteningParams {
    algebra: SlAlgebra,
    p: usize,
}

impl FlatteningParams {
    /// Validate `n >= 2` and `0 <= p < n² - 1`.
    pub fn new(n: usize, p: usize) -> Result<Self, KoszulError> {
        let algebra = SlAlgebra::new(n)?;
        if p >= algebra.dim() {
            return Err(KoszulError::InvalidParameter(format!(
                "p must lie in [0, {}) for n = {n}, got {p}",
                algebra.dim()
            )));
        }
        Ok(Self { algebra, p })
    }

    /// The algebra context.
    pub fn algebra(&self) -> SlAlgebra {
        self.algebra
    }

    /// The exterior power degree.
    pub fn p(&self) -> usize {
        self.p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Run `f` with the limit variables set to `values`, restoring them after.
    fn with_limit_env<T>(values: [Option<&str>; 2], f: impl FnOnce() -> T) -> T {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let vars = ["KOSZUL_MAX_TENSOR_ENTRIES", "KOSZUL_MAX_DIMENSION"];
        let saved: Vec<_> = vars.iter().map(|v| std::env::var_os(v)).collect();
        for (var, value) in vars.iter().zip(values) {
            match value {
                Some(value) => std::env::set_var(var, value),
                None => std::env::remove_var(var),
            }
        }
        let out = f();
        for (var, value) in vars.iter().zip(saved) {
            match value {
                Some(value) => std::env::set_var(var, value),
                None => std::env::remove_var(var),
            }
        }
        out
    }

    #[test]
    fn limits_from_env_reads_overrides() {
        let limits = with_limit_env([Some("1000"), Some(" 64 ")], Limits::from_env);
        assert_eq!(limits.max_tensor_entries, 1000);
        assert_eq!(limits.max_dimension, 64);
    }

    #[test]
    fn limits_from_env_falls_back_to_defaults() {
        let unset = with_limit_env([None, None], Limits::from_env);
        assert_eq!(unset, Limits::default());

        let garbage = with_limit_env([Some("lots"), Some("-1")], Limits::from_env);
        assert_eq!(garbage, Limits::default());

        let mixed = with_limit_env([None, Some("12")], Limits::from_env);
        assert_eq!(mixed.max_tensor_entries, DEFAULT_MAX_TENSOR_ENTRIES);
        assert_eq!(mixed.max_dimension, 12);
    }

    #[test]
    fn params_validate_range() {
        assert!(FlatteningParams::new(2, 0).is_ok());
        assert!(FlatteningParams::new(2, 2).is_ok());
        assert!(matches!(
            FlatteningParams::new(2, 3),
            Err(KoszulError::InvalidParameter(_))
        ));
        assert!(FlatteningParams::new(1, 0).is_err());
    }

    #[test]
    fn limits_reject_oversized_requests() {
        let limits = Limits {
            max_tensor_entries: 100,
            max_dimension: 10,
        };
        assert!(limits.check_tensor(100).is_ok());
        let err = limits.check_tensor(101).unwrap_err();
        assert_eq!(
            err,
            KoszulError::ResourceLimit {
                what: "dense structure tensor".into(),
                requested: 101,
                limit: 100
            }
        );
        assert!(limits.check_dimension("K rows", 11).is_err());
    }

    #[test]
    fn checked_dim_detects_overflow() {
        assert_eq!(checked_dim("x", &[3, 4, 5]).unwrap(), 60);
        assert!(matches!(
            checked_dim("x", &[usize::MAX, 2]),
            Err(KoszulError::Overflow(_))
        ));
    }

    #[test]
    fn limits_deserialize_with_defaults() {
        let limits: Limits = serde_json::from_str(r#"{"max_dimension": 42}"#).unwrap();
        assert_eq!(limits.max_dimension, 42);
        assert_eq!(limits.max_tensor_entries, DEFAULT_MAX_TENSOR_ENTRIES);
    }
}
