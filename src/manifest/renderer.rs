//! Rendering of pipeline run manifests and tracking documents.

use super::context::{ManifestContext, TrackingContext};
use crate::error::Result;
use crate::template::Template;
use serde::Serialize;

/// One rendered pipeline run manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedManifest {
    /// `metadata.name` of the manifest.
    pub name: String,
    /// Invocation the manifest was rendered for.
    pub invocation: String,
    /// Stage number.
    pub stage: i64,
    /// Manifest text.
    pub text: String,
}

/// The rendered tracking document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingDocument {
    /// `metadata.name` of the document.
    pub name: String,
    /// Document text.
    pub text: String,
}

/// Render one manifest, consuming its context.
///
/// # Errors
///
/// `TemplateExecution` if the template references something the context
/// does not provide.
pub fn render_manifest(
    context: ManifestContext,
    stage: i64,
    template: &Template,
) -> Result<RenderedManifest> {
    let text = template.execute(&context.to_scope()?)?;

    Ok(RenderedManifest {
        name: context.manifest_name(),
        invocation: context.name,
        stage,
        text,
    })
}

/// Render the tracking document.
///
/// # Errors
///
/// `TemplateExecution` if the template references something the context
/// does not provide.
pub fn render_tracking_document(
    context: TrackingContext,
    template: &Template,
) -> Result<TrackingDocument> {
    let text = template.execute(&context.to_scope()?)?;

    Ok(TrackingDocument {
        name: context.name,
        text,
    })
}
