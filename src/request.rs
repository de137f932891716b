//! Revision-run requests.
//!
//! A request describes one pushed commit and the pipeline invocations to
//! trigger for it. It is read from YAML or JSON:
//!
//! ```yaml
//! author: patrick
//! commit_id: a1b2c3d4e5
//! repo_name: stageTime-server
//! repo_url: https://github.com/stuttgart-things/stageTime-server.git
//! pushed_at: "2024-03-18T09:03:12Z"
//! pipelineruns:
//!   - name: build-kaniko
//!     stage: 0
//!     params: context=/kaniko/decoder, dockerfile=./Dockerfile
//!     listparams: build-args=GO_VERSION=1.21;CGO_ENABLED=0
//!     workspaces: source=persistentVolumeClaim;claimName;git-pvc
//! ```
//!
//! The three encoded fields are kept raw here and decoded per invocation by
//! the `encoding` module.

use crate::error::{Result, StageTimeError};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// An incoming revision-run request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionRunRequest {
    /// Commit author.
    pub author: String,

    /// Full commit id; at least four characters.
    #[serde(alias = "commitId")]
    pub commit_id: String,

    /// Repository name.
    #[serde(alias = "repoName")]
    pub repo_name: String,

    /// Repository clone URL.
    #[serde(alias = "repoUrl")]
    pub repo_url: String,

    /// When the commit was pushed, as sent by the caller.
    #[serde(alias = "pushedAt")]
    pub pushed_at: String,

    /// Invocations in submission order.
    #[serde(alias = "pipelineRuns")]
    pub pipelineruns: Vec<RunInvocation>,
}

/// One pipeline invocation inside a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunInvocation {
    /// Pipeline name; also the referenced pipeline.
    pub name: String,

    /// Stage number the invocation belongs to.
    pub stage: i64,

    /// Scalar params encoding (`k=v,k=v`).
    pub params: String,

    /// List params encoding (`k=v1;v2,k=v`).
    #[serde(alias = "listParams")]
    pub listparams: String,

    /// Workspaces encoding (`name=kind;short-name;reference,...`).
    pub workspaces: String,
}

impl RunInvocation {
    /// Stage number as the label used in names, labels, and the tracking document.
    pub fn stage_label(&self) -> String {
        self.stage.to_string()
    }
}

impl RevisionRunRequest {
    /// Load a request from a file, or from stdin when the path is `-`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = if path == Path::new("-") {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map_err(|e| {
                StageTimeError::UserError(format!("failed to read request from stdin: {}", e))
            })?;
            buf
        } else {
            std::fs::read_to_string(path).map_err(|e| {
                StageTimeError::UserError(format!(
                    "failed to read request file '{}': {}",
                    path.display(),
                    e
                ))
            })?
        };

        Self::from_yaml(&content)
    }

    /// Parse a request from YAML (JSON is accepted as a YAML subset).
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let request: RevisionRunRequest = serde_yaml::from_str(yaml)
            .map_err(|e| StageTimeError::UserError(format!("failed to parse request: {}", e)))?;

        request.validate()?;
        Ok(request)
    }

    /// Validate the fields every invocation depends on.
    ///
    /// The commit id length is not checked here; a short id is reported per
    /// invocation as `InvalidIdentity`. Commit ids and invocation names end
    /// up in document names, so neither may contain a path separator.
    pub fn validate(&self) -> Result<()> {
        if self.commit_id.trim().is_empty() {
            return Err(StageTimeError::UserError(
                "request validation failed: commit_id must not be empty".to_string(),
            ));
        }

        if self.repo_name.trim().is_empty() {
            return Err(StageTimeError::UserError(
                "request validation failed: repo_name must not be empty".to_string(),
            ));
        }

        if has_path_separator(&self.commit_id) {
            return Err(StageTimeError::UserError(format!(
                "request validation failed: commit_id '{}' must not contain '/' or '\\'",
                self.commit_id
            )));
        }

        for (index, invocation) in self.pipelineruns.iter().enumerate() {
            if invocation.name.trim().is_empty() {
                return Err(StageTimeError::UserError(format!(
                    "request validation failed: pipelinerun #{} has no name",
                    index + 1
                )));
            }

            if has_path_separator(&invocation.name) {
                return Err(StageTimeError::UserError(format!(
                    "request validation failed: pipelinerun name '{}' \
                     must not contain '/' or '\\'",
                    invocation.name
                )));
            }
        }

        Ok(())
    }
}

fn has_path_separator(value: &str) -> bool {
    value.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const REQUEST_YAML: &str = r#"
author: patrick
commit_id: a1b2c3d4e5
repo_name: stageTime-server
repo_url: https://github.com/stuttgart-things/stageTime-server.git
pushed_at: "2024-03-18T09:03:12Z"
pipelineruns:
  - name: build-kaniko
    stage: 0
    params: context=/kaniko/decoder, dockerfile=./Dockerfile
    listparams: build-args=GO_VERSION=1.21;CGO_ENABLED=0
    workspaces: source=persistentVolumeClaim;claimName;git-pvc
  - name: lint
    stage: 1
"#;

    #[test]
    fn test_parse_yaml_request() {
        let request = RevisionRunRequest::from_yaml(REQUEST_YAML).unwrap();

        assert_eq!(request.author, "patrick");
        assert_eq!(request.commit_id, "a1b2c3d4e5");
        assert_eq!(request.pipelineruns.len(), 2);
        assert_eq!(request.pipelineruns[0].name, "build-kaniko");
        assert_eq!(request.pipelineruns[0].stage, 0);
        assert_eq!(
            request.pipelineruns[0].workspaces,
            "source=persistentVolumeClaim;claimName;git-pvc"
        );
    }

    #[test]
    fn test_missing_encodings_default_to_empty() {
        let request = RevisionRunRequest::from_yaml(REQUEST_YAML).unwrap();
        let lint = &request.pipelineruns[1];

        assert_eq!(lint.params, "");
        assert_eq!(lint.listparams, "");
        assert_eq!(lint.workspaces, "");
        assert_eq!(lint.stage_label(), "1");
    }

    #[test]
    fn test_parse_json_request_with_camel_case() {
        let json = r#"{
            "author": "patrick",
            "commitId": "deadbeef",
            "repoName": "repo",
            "pipelineRuns": [{"name": "test", "stage": 2, "listParams": "a=1;2"}]
        }"#;
        let request = RevisionRunRequest::from_yaml(json).unwrap();

        assert_eq!(request.commit_id, "deadbeef");
        assert_eq!(request.pipelineruns[0].stage, 2);
        assert_eq!(request.pipelineruns[0].listparams, "a=1;2");
    }

    #[test]
    fn test_empty_commit_is_rejected() {
        let err = RevisionRunRequest::from_yaml("repo_name: repo\n").unwrap_err();
        assert!(err.to_string().contains("commit_id"));
    }

    #[test]
    fn test_unnamed_invocation_is_rejected() {
        let yaml = "commit_id: abcd\nrepo_name: repo\npipelineruns:\n  - stage: 1\n";
        let err = RevisionRunRequest::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("pipelinerun #1 has no name"));
    }

    #[test]
    fn test_invalid_yaml_is_user_error() {
        let err = RevisionRunRequest::from_yaml("pipelineruns: [").unwrap_err();
        assert!(matches!(err, StageTimeError::UserError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(REQUEST_YAML.as_bytes()).unwrap();

        let request = RevisionRunRequest::load(file.path()).unwrap();
        assert_eq!(request.repo_name, "stageTime-server");
    }

    #[test]
    fn test_load_missing_file() {
        let err = RevisionRunRequest::load("/nonexistent/request.yaml").unwrap_err();
        assert!(err.to_string().contains("failed to read request file"));
    }

    #[test]
    fn test_path_separators_are_rejected() {
        let yaml = "commit_id: abcd\nrepo_name: repo\npipelineruns:\n  - name: ../../escaped\n";
        let err = RevisionRunRequest::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, StageTimeError::UserError(_)));
        assert!(err.to_string().contains("pipelinerun name '../../escaped'"));

        let err = RevisionRunRequest::from_yaml("commit_id: ab/cd\nrepo_name: repo\n").unwrap_err();
        assert!(err.to_string().contains("commit_id 'ab/cd'"));

        let yaml = "commit_id: abcd\nrepo_name: repo\npipelineruns:\n  - name: 'a\\b'\n";
        assert!(RevisionRunRequest::from_yaml(yaml).is_err());
    }
}
