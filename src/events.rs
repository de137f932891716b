//! Event logging for render runs.
//!
//! Events are appended in NDJSON format (one JSON object per line) to the
//! file named by `events_file` in `stagetime.yaml` or `--events`. Logging is
//! off when neither is set.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: What happened (render, invocation_failed, ...)
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `commit`: Optional commit id of the request being rendered
//! - `details`: Freeform object with action-specific details

use crate::error::{Result, StageTimeError};
use crate::manifest::RunOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// A request was rendered (possibly partially).
    Render,
    /// One invocation of a request failed to render.
    InvocationFailed,
    /// The tracking document of a request was rendered.
    TrackingRendered,
    /// An inline template was rendered.
    TemplateRender,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Render => write!(f, "render"),
            EventAction::InvocationFailed => write!(f, "invocation_failed"),
            EventAction::TrackingRendered => write!(f, "tracking_rendered"),
            EventAction::TemplateRender => write!(f, "template_render"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Commit id of the request, for request-scoped events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action.
    ///
    /// The timestamp is set to the current time, and the actor is
    /// determined from the environment (USER@HOSTNAME).
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            commit: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the commit id for this event.
    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            StageTimeError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

/// The events describing one rendered request, in the order they happened.
pub fn run_events(outcome: &RunOutcome) -> Vec<Event> {
    let mut events: Vec<Event> = outcome
        .failures
        .iter()
        .map(|failure| {
            Event::new(EventAction::InvocationFailed)
                .with_commit(&outcome.commit_id)
                .with_details(json!({
                    "invocation": failure.invocation,
                    "stage": failure.stage,
                    "kind": failure.kind,
                    "message": failure.message,
                }))
        })
        .collect();

    if let Some(tracking) = &outcome.tracking {
        events.push(
            Event::new(EventAction::TrackingRendered)
                .with_commit(&outcome.commit_id)
                .with_details(json!({ "name": tracking.name })),
        );
    }

    events.push(
        Event::new(EventAction::Render)
            .with_commit(&outcome.commit_id)
            .with_details(json!({
                "manifests": outcome.result.manifest_count(),
                "stages": outcome.result.stages(),
                "failures": outcome.failures.len(),
            })),
    );

    events
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append events to an NDJSON log, creating the file and its directory as needed.
///
/// # Returns
///
/// * `Ok(())` - Events were appended
/// * `Err(StageTimeError::UserError)` - Serialization or write failed
pub fn append_events(path: &Path, events: &[Event]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            StageTimeError::UserError(format!(
                "failed to create events directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut lines = String::new();
    for event in events {
        lines.push_str(&event.to_ndjson_line()?);
        lines.push('\n');
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            StageTimeError::UserError(format!(
                "failed to open events file '{}': {}",
                path.display(),
                e
            ))
        })?;

    file.write_all(lines.as_bytes()).map_err(|e| {
        StageTimeError::UserError(format!(
            "failed to write events to '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

/// Append events when an event log is configured; otherwise do nothing.
pub fn record(path: Option<&Path>, events: &[Event]) -> Result<()> {
    match path {
        Some(path) => append_events(path, events),
        None => Ok(()),
    }
}
