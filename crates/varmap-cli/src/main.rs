//! varmap - variant to specification mapper
//!
//! Usage:
//!   varmap Variants.csv Specifications.csv variants_mapping.json [THRESHOLD] \
//!     [SOURCE_COLUMN] [CANDIDATE_COLUMN]
//!
//!   # Every Output/<Brand>/<model>/ directory at once
//!   varmap --batch Output --strategy optimal --threshold 0.6
//!
//! Exit status: 0 on success (unmapped labels included), 2 for invalid
//! settings, 1 for file errors.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use varmap_cli::{exit_code, run, Args};

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.quiet);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Log to stderr so stdout carries only the rendered mapping.
fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = if quiet {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
