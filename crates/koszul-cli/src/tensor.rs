//! # Tensor Subcommand
//!
//! Lists the nonzero structure constants `T[i,j,k]` of sl(n) together with
//! the generators they relate, and the statistics of the build.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use koszul_core::{Generator, Limits, SlAlgebra};
use koszul_tensor::{BuildStats, StructureTensor};

use crate::config::KoszulConfig;

/// Arguments for the `koszul tensor` subcommand.
#[derive(Args, Debug)]
pub struct TensorArgs {
    /// Matrix size n of sl(n). Prompted for when omitted.
    #[arg(short = 'n', long)]
    pub n: Option<usize>,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// One nonzero structure constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TensorEntry {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub value: i64,
    /// Generator at flat index `i`.
    pub left: Generator,
    /// Generator at flat index `j`.
    pub right: Generator,
    /// Generator at flat index `k`.
    pub result: Generator,
}

/// Output of `koszul tensor`.
#[derive(Debug, Clone, Serialize)]
pub struct TensorReport {
    pub n: usize,
    pub dim: usize,
    pub nnz: usize,
    pub stats: BuildStats,
    pub entries: Vec<TensorEntry>,
}

/// Build the structure tensor of sl(`n`) and describe its nonzeros.
pub fn tensor_report(n: usize, limits: &Limits) -> Result<TensorReport> {
    let algebra = SlAlgebra::new(n)?;
    let tensor = StructureTensor::build(algebra, limits)
        .with_context(|| format!("failed to build the structure tensor of sl({n})"))?;
    let entries = tensor
        .nonzeros()
        .map(|(i, j, k, value)| {
            Ok(TensorEntry {
                i,
                j,
                k,
                value,
                left: algebra.to_pair(i)?,
                right: algebra.to_pair(j)?,
                result: algebra.to_pair(k)?,
            })
        })
        .collect::<Result<Vec<_>, koszul_core::KoszulError>>()?;
    Ok(TensorReport {
        n,
        dim: tensor.dim(),
        nnz: tensor.nnz(),
        stats: tensor.stats(),
        entries,
    })
}

/// Execute the tensor subcommand.
pub fn run_tensor(args: &TensorArgs, config: &KoszulConfig) -> Result<u8> {
    let n = crate::value_or_prompt(args.n, "n")?;
    let report = tensor_report(n, &config.limits())?;

    if args.json {
        crate::print_json(&report)?;
        return Ok(0);
    }
    println!("sl({}) structure tensor: m = {}, {} nonzeros", report.n, report.dim, report.nnz);
    for e in &report.entries {
        println!(
            "T[{},{},{}] = {:>3}    [{}, {}] -> {}",
            e.i, e.j, e.k, e.value, e.left, e.right, e.result
        );
    }
    println!(
        "brackets evaluated: {}, terms accumulated: {}, terms dropped: {}",
        report.stats.bracket_evaluations, report.stats.accumulated_terms, report.stats.dropped_terms
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sl2_report_lists_six_constants() {
        let report = tensor_report(2, &Limits::default()).unwrap();
        assert_eq!((report.dim, report.nnz), (3, 6));
        assert_eq!(report.entries.len(), 6);
        assert_eq!(report.stats.dropped_terms, 2);

        // [E, F] = H
        let ef = report
            .entries
            .iter()
            .find(|e| (e.i, e.j) == (1, 2))
            .unwrap();
        assert_eq!((ef.k, ef.value), (0, 1));
        assert_eq!(ef.left, Generator::new(0, 1));
        assert_eq!(ef.right, Generator::new(1, 0));
        assert_eq!(ef.result, Generator::new(0, 0));
    }

    #[test]
    fn invalid_n_is_rejected() {
        assert!(tensor_report(1, &Limits::default()).is_err());
    }
}
