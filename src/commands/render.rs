//! Implementation of the `stagetime render` command.
//!
//! Renders every invocation of a request plus the tracking document, then
//! prints them, or writes them to a directory when `--output-dir` is given.
//! Invocations that fail are listed on stderr after the output.

use super::load_config;
use crate::cli::{OutputFormat, RenderArgs};
use crate::error::{Result, StageTimeError};
use crate::events;
use crate::manifest::{RunOutcome, render_run};
use crate::output;
use crate::request::RevisionRunRequest;
use chrono::{DateTime, Utc};

/// Execute the `stagetime render` command.
pub fn cmd_render(args: RenderArgs) -> Result<()> {
    let outcome = execute(&args, &Utc::now())?;

    if args.output_dir.is_none() {
        match args.format {
            OutputFormat::Yaml => print!("{}", output::yaml_stream(&outcome)),
            OutputFormat::Json => println!("{}", output::json(&outcome)?),
        }
    }

    report_failures(&outcome)
}

/// Render the request and write files and events, without printing documents.
///
/// Documents that cannot be written are added to the outcome's failures.
fn execute(args: &RenderArgs, now: &DateTime<Utc>) -> Result<RunOutcome> {
    let config = load_config(args.config.as_deref(), args.namespace.as_deref())?;
    let templates = config.templates()?;
    let request = RevisionRunRequest::load(&args.request)?;

    let mut outcome = render_run(&request, &config.render_settings(), &templates, now)?;

    if let Some(dir) = &args.output_dir {
        let written = output::write_dir(&outcome, dir)?;
        for path in &written.paths {
            println!("wrote {}", path.display());
        }
        outcome.failures.extend(written.failures);
    }

    let events_path = args.events.as_deref().or(config.events_file.as_deref());
    events::record(events_path, &events::run_events(&outcome))?;

    Ok(outcome)
}

/// Print each failure to stderr and turn a partial outcome into an error.
fn report_failures(outcome: &RunOutcome) -> Result<()> {
    if outcome.is_complete() {
        return Ok(());
    }

    eprintln!("Failed:");
    for failure in &outcome.failures {
        match failure.stage {
            Some(stage) => {
                eprintln!("  {} (stage {}): {}", failure.invocation, stage, failure.message)
            }
            None => eprintln!("  {}: {}", failure.invocation, failure.message),
        }
    }

    Err(StageTimeError::PartialRender {
        failed: outcome.failures.len(),
        total: outcome.documents,
    })
}
