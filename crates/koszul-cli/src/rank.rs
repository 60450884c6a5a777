//! # Rank Subcommand
//!
//! Assembles the flattening and asks a rank oracle for its rank. The rank
//! is best effort: when the oracle fails the shapes are still reported and
//! the failure is logged, unless `--require-rank` makes it fatal.
//!
//! Without `--oracle`, the external tool is used when one is configured
//! and the rank is skipped otherwise. In-process elimination answers
//! modulo a prime; its reports carry `exact: false` and the modulus,
//! since that rank is only a lower bound on the rank over Q.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use koszul_oracle::{EliminationOracle, OracleError, ProcessOracle, RankOracle, SmsMatrix};
use koszul_tensor::KoszulFlattening;

use crate::config::KoszulConfig;
use crate::flatten::{assemble, FlattenReport};

/// Which rank backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OracleKind {
    /// In-process sparse elimination modulo 2^31 - 1 (a lower bound).
    Elimination,
    /// External executable reading the interchange format on stdin.
    Process,
    /// Skip the rank computation.
    None,
}

/// Arguments for the `koszul rank` subcommand.
#[derive(Args, Debug)]
pub struct RankArgs {
    /// Matrix size n of sl(n). Prompted for when omitted.
    #[arg(short = 'n', long)]
    pub n: Option<usize>,

    /// Exterior degree p, 0 <= p < n² - 1. Prompted for when omitted.
    #[arg(short = 'p', long)]
    pub p: Option<usize>,

    /// Rank backend. Defaults to `process` when a rank tool is configured,
    /// otherwise the rank is skipped.
    #[arg(long, value_enum)]
    pub oracle: Option<OracleKind>,

    /// External rank tool for the `process` backend.
    #[arg(long, value_name = "PATH")]
    pub rank_bin: Option<PathBuf>,

    /// Seconds before the external rank tool is killed.
    #[arg(long, value_name = "S")]
    pub timeout_secs: Option<u64>,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Fail instead of warning when no rank could be obtained.
    #[arg(long)]
    pub require_rank: bool,
}

/// Output of `koszul rank`.
#[derive(Debug, Clone, Serialize)]
pub struct RankReport {
    #[serde(flatten)]
    pub flattening: FlattenReport,
    pub oracle: Option<String>,
    pub rank: Option<usize>,
    /// True only when `rank` is the exact rank over Q.
    pub exact: bool,
    /// Prime the rank was computed modulo, for modular backends.
    pub modulus: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Instantiate the backend selected by `args`.
pub fn build_oracle(
    args: &RankArgs,
    config: &KoszulConfig,
) -> Result<Option<Box<dyn RankOracle>>> {
    let kind = match args.oracle {
        Some(kind) => kind,
        None if config.has_rank_tool(args.rank_bin.as_deref()) => OracleKind::Process,
        None => {
            tracing::info!("no rank tool configured; skipping rank");
            OracleKind::None
        }
    };
    let oracle: Box<dyn RankOracle> = match kind {
        OracleKind::Elimination => Box::new(EliminationOracle::new()),
        OracleKind::Process => {
            let oracle_config = config.oracle(args.rank_bin.as_deref(), args.timeout_secs)?;
            Box::new(ProcessOracle::new(oracle_config))
        }
        OracleKind::None => return Ok(None),
    };
    Ok(Some(oracle))
}

/// Rank of an assembled flattening.
pub fn flattening_rank(
    flattening: &KoszulFlattening,
    oracle: &dyn RankOracle,
) -> Result<usize, OracleError> {
    oracle.rank(&SmsMatrix::from_csmat(flattening.matrix()))
}

/// Pair a flattening with the oracle's answer, or with the oracle's error.
pub fn rank_report(flattening: &KoszulFlattening, oracle: Option<&dyn RankOracle>) -> RankReport {
    let mut report = RankReport {
        flattening: FlattenReport::new(flattening),
        oracle: oracle.map(|o| o.name().to_string()),
        rank: None,
        exact: false,
        modulus: oracle.and_then(|o| o.modulus()),
        error: None,
    };
    let Some(oracle) = oracle else {
        return report;
    };
    match flattening_rank(flattening, oracle) {
        Ok(rank) => {
            tracing::info!(
                oracle = oracle.name(),
                rank,
                modulus = oracle.modulus(),
                "rank computed"
            );
            report.rank = Some(rank);
            report.exact = oracle.is_exact();
        }
        Err(e) => {
            tracing::warn!(oracle = oracle.name(), "rank unavailable: {e}");
            report.error = Some(e.to_string());
        }
    }
    report
}

/// Execute the rank subcommand.
pub fn run_rank(args: &RankArgs, config: &KoszulConfig) -> Result<u8> {
    let params = crate::resolve_params(args.n, args.p)?;
    let oracle = build_oracle(args, config)?;
    let flattening = assemble(params, &config.limits())?;
    let report = rank_report(&flattening, oracle.as_deref());

    if args.require_rank && report.rank.is_none() {
        let reason = report.error.as_deref().unwrap_or("no rank oracle selected and no rank tool configured");
        bail!("rank is required but was not computed: {reason}");
    }

    if args.json {
        crate::print_json(&report)?;
    } else {
        report.flattening.print();
        match (&report.oracle, report.rank, report.modulus) {
            (Some(name), Some(rank), None) => println!("  rank {rank} ({name})"),
            (Some(name), Some(rank), Some(p)) => {
                println!("  rank mod {p}: {rank} ({name}; lower bound on the exact rank)")
            }
            (Some(name), None, _) => println!("  rank unavailable ({name})"),
            (None, _, _) => println!("  rank skipped"),
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(oracle: Option<OracleKind>, rank_bin: Option<&str>) -> RankArgs {
        RankArgs {
            n: Some(2),
            p: Some(0),
            oracle,
            rank_bin: rank_bin.map(PathBuf::from),
            timeout_secs: None,
            json: false,
            require_rank: false,
        }
    }

    #[test]
    fn configured_tool_is_the_default_backend() {
        let config = KoszulConfig::default();
        let oracle = build_oracle(&args(None, Some("/opt/linbox/rank")), &config)
            .unwrap()
            .unwrap();
        assert_eq!(oracle.name(), "process");
        assert!(oracle.is_exact());
    }

    #[test]
    fn elimination_is_explicit_and_modular() {
        let config = KoszulConfig::default();
        let oracle = build_oracle(&args(Some(OracleKind::Elimination), None), &config)
            .unwrap()
            .unwrap();
        assert_eq!(oracle.name(), "elimination");
        assert_eq!(oracle.modulus(), Some(koszul_oracle::DEFAULT_PRIME));
    }

    #[test]
    fn none_skips_even_with_a_tool() {
        let config = KoszulConfig::default();
        let oracle = build_oracle(&args(Some(OracleKind::None), Some("/bin/rank")), &config);
        assert!(oracle.unwrap().is_none());
    }
}
