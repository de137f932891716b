//! Rendering context for one pipeline run manifest.

use crate::encoding::{
    ParsedListParams, ParsedParams, WorkspaceBinding, parse_list_params, parse_scalar_params,
    parse_workspaces,
};
use crate::error::{Result, StageTimeError};
use crate::naming;
use crate::request::{RevisionRunRequest, RunInvocation};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Deployment settings applied to every manifest of a request.
///
/// Resolved once from `Config` and passed in explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Namespace manifests are created in.
    pub namespace: String,
    /// Service account every pipeline run uses.
    pub service_account: String,
    /// Pipeline run timeout.
    pub timeout: String,
    /// Prefix of every manifest name.
    pub name_prefix: String,
}

/// Everything the pipeline run template can reference.
///
/// Serializes with PascalCase keys (`RevisionRunCommitId`, `ListParams`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManifestContext {
    /// Invocation name.
    pub name: String,
    /// Commit author.
    pub revision_run_author: String,
    /// Repository name.
    pub revision_run_repo_name: String,
    /// Repository URL.
    pub revision_run_repo_url: String,
    /// Full commit id.
    pub revision_run_commit_id: String,
    /// Push timestamp as received.
    pub revision_run_creation: String,
    /// Target namespace.
    pub namespace: String,
    /// Referenced pipeline; the invocation name.
    pub pipeline_ref: String,
    /// Service account.
    pub service_account: String,
    /// Run timeout.
    pub timeout: String,
    /// Decoded scalar params.
    pub params: ParsedParams,
    /// Decoded list params.
    pub list_params: ParsedListParams,
    /// Decoded workspaces, in encoding order.
    pub workspaces: Vec<WorkspaceBinding>,
    /// Manifest name prefix.
    pub name_prefix: String,
    /// Manifest name suffix (time token + commit fragment).
    pub name_suffix: String,
    /// Stage label.
    pub stage: String,
}

impl ManifestContext {
    /// Decode an invocation and assemble its context.
    ///
    /// # Errors
    ///
    /// `MalformedEncoding` from any of the three encodings, or
    /// `InvalidIdentity` if the commit id is too short to name the manifest.
    pub fn build(
        request: &RevisionRunRequest,
        invocation: &RunInvocation,
        settings: &RenderSettings,
        now: &DateTime<Utc>,
    ) -> Result<Self> {
        let params = parse_scalar_params(&invocation.params)?;
        let list_params = parse_list_params(&invocation.listparams)?;
        let workspaces = parse_workspaces(&invocation.workspaces)?;
        let name_suffix = naming::name_suffix(&request.commit_id, now)?;

        Ok(Self {
            name: invocation.name.clone(),
            revision_run_author: request.author.clone(),
            revision_run_repo_name: request.repo_name.clone(),
            revision_run_repo_url: request.repo_url.clone(),
            revision_run_commit_id: request.commit_id.clone(),
            revision_run_creation: request.pushed_at.clone(),
            namespace: settings.namespace.clone(),
            pipeline_ref: invocation.name.clone(),
            service_account: settings.service_account.clone(),
            timeout: settings.timeout.clone(),
            params,
            list_params,
            workspaces,
            name_prefix: settings.name_prefix.clone(),
            name_suffix,
            stage: invocation.stage_label(),
        })
    }

    /// The `metadata.name` the built-in template produces.
    pub fn manifest_name(&self) -> String {
        naming::manifest_name(&self.name_prefix, &self.stage, &self.name, &self.name_suffix)
    }

    /// The template scope for this context.
    pub(crate) fn to_scope(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| {
            StageTimeError::TemplateExecution(format!(
                "failed to build template scope for '{}': {}",
                self.name, e
            ))
        })
    }
}

/// Everything the tracking document template can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrackingContext {
    /// Tracking document name (`revisionrun-{commit}`).
    pub name: String,
    /// Target namespace.
    pub namespace: String,
    /// Repository name.
    pub repository: String,
    /// Repository URL.
    pub repository_url: String,
    /// Full commit id.
    pub revision_run_commit_id: String,
    /// Push timestamp as received.
    pub pushed_at: String,
    /// Distinct stage labels, first-seen order.
    pub stages: Vec<String>,
}

impl TrackingContext {
    /// Assemble the tracking context for a request.
    pub fn build(
        request: &RevisionRunRequest,
        settings: &RenderSettings,
        stages: &[String],
    ) -> Self {
        Self {
            name: naming::tracking_document_name(&request.commit_id),
            namespace: settings.namespace.clone(),
            repository: request.repo_name.clone(),
            repository_url: request.repo_url.clone(),
            revision_run_commit_id: request.commit_id.clone(),
            pushed_at: request.pushed_at.clone(),
            stages: stages.to_vec(),
        }
    }

    pub(crate) fn to_scope(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| {
            StageTimeError::TemplateExecution(format!(
                "failed to build tracking template scope: {}",
                e
            ))
        })
    }
}
