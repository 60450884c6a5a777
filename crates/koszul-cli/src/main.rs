//! # koszul CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use koszul_cli::config::KoszulConfig;
use koszul_cli::flatten::{run_flatten, FlattenArgs};
use koszul_cli::rank::{run_rank, RankArgs};
use koszul_cli::tensor::{run_tensor, TensorArgs};

/// Koszul flattening analysis for the structure tensor of sl(n).
///
/// Builds the structure tensor in the elementary-matrix basis, assembles
/// its degree-p Koszul flattening, and computes the flattening's rank,
/// from which a lower bound on the tensor's border rank follows.
#[derive(Parser, Debug)]
#[command(name = "koszul", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the nonzero structure constants of sl(n).
    Tensor(TensorArgs),

    /// Assemble the degree-p flattening and report operator shapes.
    Flatten(FlattenArgs),

    /// Assemble the flattening and compute its rank.
    Rank(RankArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("koszul CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = KoszulConfig::load(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Tensor(args) => run_tensor(args, &config),
        Commands::Flatten(args) => run_flatten(args, &config),
        Commands::Rank(args) => run_rank(args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
