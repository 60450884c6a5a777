//! # Flatten Subcommand
//!
//! Assembles the degree-p Koszul flattening of sl(n), reports the shape of
//! every intermediate operator, and optionally exports `TAp` in the sparse
//! interchange format for an external rank tool.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use koszul_core::{FlatteningParams, Limits};
use koszul_oracle::SmsMatrix;
use koszul_tensor::{FlatteningShapes, KoszulFlattening};

use crate::config::KoszulConfig;

/// Arguments for the `koszul flatten` subcommand.
#[derive(Args, Debug)]
pub struct FlattenArgs {
    /// Matrix size n of sl(n). Prompted for when omitted.
    #[arg(short = 'n', long)]
    pub n: Option<usize>,

    /// Exterior degree p, 0 <= p < n² - 1. Prompted for when omitted.
    #[arg(short = 'p', long)]
    pub p: Option<usize>,

    /// Write the flattening to this file in the interchange format.
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Output of `koszul flatten`.
#[derive(Debug, Clone, Serialize)]
pub struct FlattenReport {
    pub n: usize,
    pub p: usize,
    pub dim: usize,
    pub shapes: FlatteningShapes,
    pub nnz: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported: Option<PathBuf>,
}

impl FlattenReport {
    /// Summarize an assembled flattening.
    pub fn new(flattening: &KoszulFlattening) -> Self {
        let params = flattening.params();
        Self {
            n: params.algebra().n(),
            p: params.p(),
            dim: params.algebra().dim(),
            shapes: flattening.shapes(),
            nnz: flattening.nnz(),
            exported: None,
        }
    }

    /// Print the text form to stdout.
    pub fn print(&self) {
        println!("sl({}) Koszul flattening, p = {}, m = {}", self.n, self.p, self.dim);
        println!("  Tf   {}", self.shapes.tf);
        println!("  K    {}", self.shapes.k);
        println!("  Aop  {}", self.shapes.aop);
        println!("  P    {}", self.shapes.p);
        println!("  TAp  {}", self.shapes.tap);
        println!("  nnz  {}", self.nnz);
        if let Some(path) = &self.exported {
            println!("  exported to {}", path.display());
        }
    }
}

/// Build the tensor and assemble its flattening.
pub fn assemble(params: FlatteningParams, limits: &Limits) -> Result<KoszulFlattening> {
    let (_, flattening) = KoszulFlattening::compute(params, limits).with_context(|| {
        format!(
            "failed to assemble the flattening for n = {}, p = {}",
            params.algebra().n(),
            params.p()
        )
    })?;
    Ok(flattening)
}

/// Write `flattening` to `path` in the interchange format.
pub fn export(flattening: &KoszulFlattening, path: &Path) -> Result<()> {
    let sms = SmsMatrix::from_csmat(flattening.matrix());
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    sms.write_to(&mut out)
        .and_then(|()| out.flush())
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), nnz = sms.nnz(), "exported flattening");
    Ok(())
}

/// Execute the flatten subcommand.
pub fn run_flatten(args: &FlattenArgs, config: &KoszulConfig) -> Result<u8> {
    let params = crate::resolve_params(args.n, args.p)?;
    let flattening = assemble(params, &config.limits())?;
    let mut report = FlattenReport::new(&flattening);

    if let Some(path) = &args.export {
        export(&flattening, path)?;
        report.exported = Some(path.clone());
    }

    if args.json {
        crate::print_json(&report)?;
    } else {
        report.print();
    }
    Ok(0)
}
