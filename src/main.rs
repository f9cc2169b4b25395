//! # Data Sweeper command line entry point
//!
//! Drives the pipeline for one file the way the web page does: greet, show
//! the file and a preview, optionally clean, keep chosen columns, print a
//! chart description, and write the converted file.
//!
//! ```bash
//! data-sweeper --name Ada sales.xlsx --clean --columns region,amount \
//!     --chart histogram --chart-column amount --to csv --output-dir out/
//! ```
//!
//! Any pipeline error is reported as `Error loading file: <description>` and
//! the process exits with status 1. Logs go to stderr; set `RUST_LOG=debug`
//! for stage-level detail or `SWEEPER_LOG_TO_FILE=1` to keep a rolling file.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout, clippy::print_stderr)] // This binary's output is its UI

mod cli;

use clap::Parser as _;
use data_sweeper::config::Settings;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let mut settings = data_sweeper::logging::bootstrap(Settings::from_env);
    if let Some(rows) = cli.preview_rows {
        settings.preview_rows = rows;
    }

    if let Err(e) = data_sweeper::logging::init(&settings) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    tracing::debug!(
        "Effective settings: {}",
        serde_json::to_string(&settings).unwrap_or_default()
    );

    match cli::run(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Pipeline failed: {e:#}");
            eprintln!("Error loading file: {e:#}");
            ExitCode::FAILURE
        }
    }
}
