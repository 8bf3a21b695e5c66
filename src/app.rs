//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the synthesis pipeline
//! - prints the summary / listing
//! - writes the module and optional manifest

use clap::Parser;

use crate::cli::{Cli, Command, GenerateArgs};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `corrgen` binary.
pub fn run() -> Result<(), AppError> {
    // We want bare `corrgen` (and `corrgen -o path`) to behave like
    // `corrgen generate ...`. Clap requires a subcommand name, so we do a
    // small, explicit rewrite of the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    match cli.command {
        Command::Generate(args) => handle_generate(args),
        Command::List => handle_list(),
        Command::Check => handle_check(),
    }
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = pipeline::GenConfig {
        out: args.out,
        manifest: args.manifest,
    };
    let run = pipeline::run_generate(&config)?;
    println!(
        "{}",
        crate::report::format_run_summary(&run.kernels, &run.out_path)
    );
    Ok(())
}

fn handle_list() -> Result<(), AppError> {
    let kernels = pipeline::run_check()?;
    println!("{}", crate::report::format_combination_list(&kernels));
    Ok(())
}

fn handle_check() -> Result<(), AppError> {
    let kernels = pipeline::run_check()?;
    println!("{} kernel pairs synthesized cleanly.", kernels.len());
    Ok(())
}

/// Rewrite argv so `corrgen` defaults to `corrgen generate`.
///
/// Rules:
/// - `corrgen`                    -> `corrgen generate`
/// - `corrgen -o kernels.rs ...`  -> `corrgen generate -o kernels.rs ...`
/// - `corrgen --help/--version`   -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("generate".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "generate" | "list" | "check");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "generate flags".
    if arg1.starts_with('-') {
        argv.insert(1, "generate".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
