//! Built-in manifest templates.
//!
//! Both templates are written in the block syntax of `crate::template`.
//! Operators can replace either one through `stagetime.yaml`; a replacement
//! sees the same fields as the built-in.

use crate::error::Result;
use crate::template::Template;

/// Tekton `PipelineRun` for one invocation.
///
/// Fields: `NamePrefix`, `Stage`, `Name`, `NameSuffix`, `Namespace`,
/// `RevisionRunCommitId`, `RevisionRunRepoName`, `RevisionRunRepoUrl`,
/// `RevisionRunAuthor`, `RevisionRunCreation`, `PipelineRef`,
/// `ServiceAccount`, `Timeout`, `Params` (map), `ListParams` (map of lists),
/// `Workspaces` (list of `Name`/`Kind`/`ShortName`/`Reference`).
pub const PIPELINE_RUN_TEMPLATE: &str = r#"apiVersion: tekton.dev/v1beta1
kind: PipelineRun
metadata:
  name: "{{ .NamePrefix }}-{{ .Stage }}-{{ .Name }}-{{ .NameSuffix }}"
  namespace: {{ .Namespace }}
  labels:
    argocd.argoproj.io/instance: tekton-runs
    stagetime/commit: "{{ .RevisionRunCommitId }}"
    stagetime/repo: {{ .RevisionRunRepoName }}
    stagetime/author: {{ .RevisionRunAuthor }}
    stagetime/stage: "{{ .Stage }}"
    tekton.dev/pipeline: {{ .PipelineRef }}
spec:
  serviceAccountName: {{ .ServiceAccount }}
  timeout: {{ .Timeout }}
  pipelineRef:
    name: {{ .PipelineRef }}
  params:{{ range .Params }}
  - name: {{ .Key }}
    value: {{ .Value }}{{ end }}{{ if .ListParams }}{{ range .ListParams }}
  - name: {{ .Key }}
    value:{{ range .Value }}
      - {{ . }}{{ end }}{{ end }}{{ end }}
  workspaces:{{ range .Workspaces }}
  - name: {{ .Name }}
    {{ .Kind }}:
      {{ .ShortName }}: {{ .Reference }}{{ end }}
"#;

/// `ConfigMap` tracking every stage of a revision run.
///
/// Fields: `Name`, `Namespace`, `Repository`, `RepositoryUrl`,
/// `RevisionRunCommitId`, `PushedAt`, `Stages` (list of labels).
pub const REVISION_RUN_TEMPLATE: &str = r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: {{ .Name }}
  namespace: {{ .Namespace }}
data:
  revisionRun: |
    repository: {{ .Repository }}{{ if .RepositoryUrl }}
    url: {{ .RepositoryUrl }}{{ end }}
    revision: {{ .RevisionRunCommitId }}{{ if .PushedAt }}
    pushedAt: {{ .PushedAt }}{{ end }}
    stages:{{ range .Stages }}
      - {{ . }}{{ end }}
"#;

/// The parsed pipeline run and tracking templates.
#[derive(Debug, Clone)]
pub struct ManifestTemplates {
    /// Template rendered once per invocation.
    pub manifest: Template,
    /// Template rendered once per request.
    pub tracking: Template,
}

impl ManifestTemplates {
    /// Parse the built-in templates.
    pub fn builtin() -> Result<Self> {
        Self::with_overrides(None, None)
    }

    /// Parse templates, using the built-in text where no override is given.
    ///
    /// # Errors
    ///
    /// `TemplateConfiguration` if either template does not parse.
    pub fn with_overrides(manifest: Option<&str>, tracking: Option<&str>) -> Result<Self> {
        Ok(Self {
            manifest: Template::parse(manifest.unwrap_or(PIPELINE_RUN_TEMPLATE))?,
            tracking: Template::parse(tracking.unwrap_or(REVISION_RUN_TEMPLATE))?,
        })
    }
}
