//! # koszul-cli — Koszul Flattening Toolkit
//!
//! Provides the `koszul` command-line interface over the tensor and oracle
//! crates.
//!
//! ## Subcommands
//!
//! - `koszul tensor`: nonzero structure constants of sl(n).
//! - `koszul flatten`: shapes of every operator in the degree-p flattening,
//!   with optional export in the sparse interchange format.
//! - `koszul rank`: flattening plus its rank from a chosen oracle.
//!
//! ```bash
//! KOSZUL_RANK_BIN=/opt/linbox/rank koszul rank -n 3 -p 2
//! koszul flatten -n 4 -p 2 --export tap_4_2.sms
//! koszul rank -n 3 -p 1 --oracle elimination
//! ```
//!
//! Results go to stdout (human-readable, or JSON with `--json`); logs go
//! to stderr.

pub mod config;
pub mod flatten;
pub mod rank;
pub mod tensor;

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use koszul_core::FlatteningParams;

/// Ask for an integer parameter on `input`, echoing `label = ` to `output`.
pub fn prompt_usize<R: BufRead, W: Write>(
    label: &str,
    input: &mut R,
    output: &mut W,
) -> Result<usize> {
    write!(output, "{label} = ")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("no value given for {label}");
    }
    line.trim()
        .parse()
        .with_context(|| format!("{label} must be a non-negative integer, got {:?}", line.trim()))
}

/// Use `value` if given, otherwise prompt for it on stdin.
pub fn value_or_prompt(value: Option<usize>, label: &str) -> Result<usize> {
    match value {
        Some(v) => Ok(v),
        None => prompt_usize(label, &mut io::stdin().lock(), &mut io::stderr()),
    }
}

/// Validated `(n, p)` from flags, prompting for whichever is missing.
pub fn resolve_params(n: Option<usize>, p: Option<usize>) -> Result<FlatteningParams> {
    let n = value_or_prompt(n, "n")?;
    let p = value_or_prompt(p, "p")?;
    FlatteningParams::new(n, p).with_context(|| format!("invalid parameters n = {n}, p = {p}"))
}

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).context("failed to write JSON output")?;
    writeln!(out)?;
    Ok(())
}
