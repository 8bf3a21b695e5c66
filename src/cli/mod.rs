//! Command-line parsing for the kernel generator.
//!
//! Argument parsing and command dispatch stay separate from the synthesis
//! code: the CLI layer only decides *what* to run and where output goes.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "corrgen",
    version,
    about = "Flux-correlation cost-function kernel generator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Synthesize every valid combination and write the kernel module.
    Generate(GenerateArgs),
    /// Print the valid combinations and their parameter layouts.
    List,
    /// Synthesize everything and validate, writing nothing.
    Check,
}

/// Options for `corrgen generate`.
#[derive(Debug, Parser, Clone)]
pub struct GenerateArgs {
    /// Output path for the generated kernel module.
    #[arg(short = 'o', long, default_value = "flux_correlation_kernels.rs")]
    pub out: PathBuf,

    /// Also write a JSON manifest describing the generated kernels.
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}
