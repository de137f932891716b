//! Rendering a whole revision-run request.
//!
//! Each invocation is decoded, named, and rendered independently. A failing
//! invocation is recorded as an `InvocationFailure` and the rest of the
//! request carries on.

use super::aggregate::StageBucketResult;
use super::context::{ManifestContext, RenderSettings, TrackingContext};
use super::renderer::{
    RenderedManifest, TrackingDocument, render_manifest, render_tracking_document,
};
use super::templates::ManifestTemplates;
use crate::error::{Result, StageTimeError};
use crate::naming;
use crate::request::{RevisionRunRequest, RunInvocation};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Why an invocation (or the tracking document) could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationFailure {
    /// Invocation name, or the tracking document name.
    pub invocation: String,
    /// Stage number; `None` for the tracking document.
    pub stage: Option<i64>,
    /// Machine-readable error kind.
    pub kind: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// The underlying error.
    #[serde(skip)]
    pub error: StageTimeError,
}

impl InvocationFailure {
    pub(crate) fn new(
        invocation: impl Into<String>,
        stage: Option<i64>,
        error: StageTimeError,
    ) -> Self {
        Self {
            invocation: invocation.into(),
            stage,
            kind: error.kind(),
            message: error.to_string(),
            error,
        }
    }
}

/// Result of rendering one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// The manifest rendered.
    Rendered(RenderedManifest),
    /// Decoding, naming, or rendering failed.
    Failed(InvocationFailure),
}

/// Result of rendering a whole request.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// Commit the request was for.
    pub commit_id: String,
    /// Manifests by stage plus distinct stage labels.
    pub result: StageBucketResult,
    /// The tracking document, unless it failed to render.
    pub tracking: Option<TrackingDocument>,
    /// Everything that failed, in request order.
    pub failures: Vec<InvocationFailure>,
    /// Documents the request asked for: one per invocation plus the tracking document.
    pub documents: usize,
}

impl RunOutcome {
    /// Whether every invocation and the tracking document rendered.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Decode, name, and render a single invocation.
pub fn render_invocation(
    request: &RevisionRunRequest,
    invocation: &RunInvocation,
    settings: &RenderSettings,
    templates: &ManifestTemplates,
    now: &DateTime<Utc>,
) -> InvocationOutcome {
    let rendered = ManifestContext::build(request, invocation, settings, now)
        .and_then(|context| render_manifest(context, invocation.stage, &templates.manifest));

    match rendered {
        Ok(manifest) => InvocationOutcome::Rendered(manifest),
        Err(error) => InvocationOutcome::Failed(InvocationFailure::new(
            &invocation.name,
            Some(invocation.stage),
            error,
        )),
    }
}

/// Render every invocation of a request and its tracking document.
///
/// Every invocation's stage is recorded in the distinct stage list, whether
/// or not it rendered, so the tracking document describes the full request.
///
/// # Errors
///
/// Only `TemplateConfiguration`, which cannot occur once `templates` has
/// been parsed; every other problem is collected into `failures`.
pub fn render_run(
    request: &RevisionRunRequest,
    settings: &RenderSettings,
    templates: &ManifestTemplates,
    now: &DateTime<Utc>,
) -> Result<RunOutcome> {
    let mut result = StageBucketResult::new();
    let mut failures = Vec::new();

    for invocation in &request.pipelineruns {
        result.record_stage(&invocation.stage_label());

        match render_invocation(request, invocation, settings, templates, now) {
            InvocationOutcome::Rendered(manifest) => result.push(manifest),
            InvocationOutcome::Failed(failure) if failure.error.is_fatal() => {
                return Err(failure.error);
            }
            InvocationOutcome::Failed(failure) => failures.push(failure),
        }
    }

    let tracking_context = TrackingContext::build(request, settings, result.stages());
    let tracking = match render_tracking_document(tracking_context, &templates.tracking) {
        Ok(document) => Some(document),
        Err(error) if error.is_fatal() => return Err(error),
        Err(error) => {
            failures.push(InvocationFailure::new(
                naming::tracking_document_name(&request.commit_id),
                None,
                error,
            ));
            None
        }
    };

    Ok(RunOutcome {
        commit_id: request.commit_id.clone(),
        result,
        tracking,
        failures,
        documents: request.pipelineruns.len() + 1,
    })
}
