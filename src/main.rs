//! Stagetime: renders staged Tekton PipelineRun manifests for revision runs.
//!
//! This is the main entry point for the `stagetime` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes.

mod cli;
mod commands;
pub mod config;
pub mod encoding;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod request;
pub mod template;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
