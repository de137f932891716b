//! Pipeline run manifest rendering.
//!
//! This module turns a revision-run request into Tekton `PipelineRun`
//! manifests and a companion tracking `ConfigMap`:
//!
//! - **Context**: decodes an invocation and assembles its template fields
//! - **Renderer**: executes the manifest and tracking templates
//! - **Aggregate**: buckets manifests by stage, tracks distinct stages
//! - **Run**: renders a whole request, collecting per-invocation failures
//! - **Templates**: the built-in templates and operator overrides

mod aggregate;
mod context;
mod renderer;
mod run;
mod templates;


pub use aggregate::StageBucketResult;
pub use context::{ManifestContext, RenderSettings, TrackingContext};
pub use renderer::{RenderedManifest, TrackingDocument, render_manifest, render_tracking_document};
pub use run::{InvocationFailure, InvocationOutcome, RunOutcome, render_invocation, render_run};
pub use templates::{ManifestTemplates, PIPELINE_RUN_TEMPLATE, REVISION_RUN_TEMPLATE};
