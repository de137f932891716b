//! Emitting rendered documents.
//!
//! A render outcome is printed as a multi-document YAML stream or a JSON
//! object, or written to a directory as one `<name>.yaml` file per document.
//! Manifests come out in ascending stage order, submission order within a
//! stage, followed by the tracking document.

use crate::error::{Result, StageTimeError};
use crate::fs::atomic_write;
use crate::manifest::{InvocationFailure, RunOutcome};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const DOCUMENT_SEPARATOR: &str = "---\n";

/// All documents of an outcome as one YAML stream.
pub fn yaml_stream(outcome: &RunOutcome) -> String {
    let mut stream = String::new();

    let documents = outcome
        .result
        .manifests()
        .map(|m| m.text.as_str())
        .chain(outcome.tracking.as_ref().map(|t| t.text.as_str()));

    for text in documents {
        stream.push_str(DOCUMENT_SEPARATOR);
        stream.push_str(text);
        if !text.ends_with('\n') {
            stream.push('\n');
        }
    }

    stream
}

/// The outcome as pretty-printed JSON.
pub fn json(outcome: &RunOutcome) -> Result<String> {
    serde_json::to_string_pretty(outcome).map_err(|e| {
        StageTimeError::UserError(format!("failed to serialize render result to JSON: {}", e))
    })
}

/// Result of writing an outcome to a directory.
#[derive(Debug, Default)]
pub struct WrittenDocuments {
    /// Files written, in document order.
    pub paths: Vec<PathBuf>,
    /// Documents that were not written.
    pub failures: Vec<InvocationFailure>,
}

/// Write every document to `dir` as `<name>.yaml`.
///
/// Each document is written atomically and independently. A document whose
/// name is not a plain file name, whose name was already written by this
/// call, or whose write fails is recorded in `failures`; the remaining
/// documents are still written. Files left by earlier runs are replaced.
///
/// # Errors
///
/// `UserError` only if `dir` itself cannot be created.
pub fn write_dir(outcome: &RunOutcome, dir: &Path) -> Result<WrittenDocuments> {
    fs::create_dir_all(dir).map_err(|e| {
        StageTimeError::UserError(format!(
            "failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let manifests = outcome
        .result
        .manifests()
        .map(|m| (m.name.as_str(), m.invocation.as_str(), Some(m.stage), m.text.as_str()));
    let tracking = outcome
        .tracking
        .as_ref()
        .map(|t| (t.name.as_str(), t.name.as_str(), None, t.text.as_str()));

    let mut report = WrittenDocuments::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for (name, invocation, stage, text) in manifests.chain(tracking) {
        let written = if !is_plain_file_name(name) {
            Err("name is not a plain file name".to_string())
        } else if !seen.insert(name) {
            Err("another document with this name was already written".to_string())
        } else {
            let path = dir.join(format!("{}.yaml", name));
            atomic_write(&path, text).map(|()| path).map_err(|e| e.to_string())
        };

        match written {
            Ok(path) => report.paths.push(path),
            Err(reason) => report.failures.push(InvocationFailure::new(
                invocation,
                stage,
                StageTimeError::UnwritableDocument {
                    name: name.to_string(),
                    reason,
                },
            )),
        }
    }

    Ok(report)
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ManifestTemplates, render_run};
    use crate::test_support::{fixed_now, invocation, request_with, sample_request, test_settings};
    use tempfile::TempDir;

    fn outcome(request: &crate::request::RevisionRunRequest) -> RunOutcome {
        let templates = ManifestTemplates::builtin().unwrap();
        render_run(request, &test_settings(), &templates, &fixed_now()).unwrap()
    }

    #[test]
    fn test_yaml_stream_order() {
        let request = request_with(vec![invocation("deploy", 2), invocation("build", 1)]);
        let stream = yaml_stream(&outcome(&request));

        let documents: Vec<serde_yaml::Value> = stream
            .split(DOCUMENT_SEPARATOR)
            .filter(|doc| !doc.trim().is_empty())
            .map(|doc| serde_yaml::from_str(doc).unwrap())
            .collect();

        assert_eq!(documents.len(), 3);
        assert_eq!(documents[0]["metadata"]["name"], "st-1-build-180312a1b2");
        assert_eq!(documents[1]["metadata"]["name"], "st-2-deploy-180312a1b2");
        assert_eq!(documents[2]["kind"], "ConfigMap");
    }

    #[test]
    fn test_json_output() {
        let text = json(&outcome(&sample_request())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["commit_id"], "a1b2c3d4e5");
        assert_eq!(value["result"]["stages"], serde_json::json!(["0", "1"]));
        assert_eq!(value["result"]["buckets"]["0"][0]["invocation"], "build-kaniko");
        assert_eq!(value["tracking"]["name"], "revisionrun-a1b2c3d4e5");
    }

    #[test]
    fn test_write_dir() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("rendered");

        let written = write_dir(&outcome(&sample_request()), &out).unwrap();

        assert_eq!(written.paths.len(), 3);
        assert!(written.failures.is_empty());
        assert!(out.join("st-0-build-kaniko-180312a1b2.yaml").exists());
        assert!(out.join("st-1-lint-180312a1b2.yaml").exists());
        let tracking = fs::read_to_string(out.join("revisionrun-a1b2c3d4e5.yaml")).unwrap();
        assert!(tracking.contains("kind: ConfigMap"));
    }

    #[test]
    fn test_write_dir_never_overwrites_a_document_of_the_same_run() {
        let temp_dir = TempDir::new().unwrap();
        let mut second = invocation("build", 1);
        second.params = "flavor=second".to_string();
        let request = request_with(vec![invocation("build", 1), second, invocation("lint", 2)]);
        let outcome = outcome(&request);
        assert_eq!(outcome.result.manifest_count(), 3);

        let written = write_dir(&outcome, temp_dir.path()).unwrap();

        assert_eq!(written.paths.len(), 3);
        assert_eq!(written.failures.len(), 1);
        assert_eq!(written.failures[0].invocation, "build");
        assert_eq!(written.failures[0].stage, Some(1));
        assert_eq!(written.failures[0].kind, "unwritable_document");

        let first_path = temp_dir.path().join("st-1-build-180312a1b2.yaml");
        let first = fs::read_to_string(first_path).unwrap();
        assert!(!first.contains("flavor"));
        assert!(temp_dir.path().join("st-2-lint-180312a1b2.yaml").exists());
        assert!(temp_dir.path().join("revisionrun-a1b2c3d4e5.yaml").exists());
    }

    #[test]
    fn test_write_dir_isolates_names_with_path_separators() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("a").join("out");
        let request = request_with(vec![invocation("../../escaped", 1), invocation("lint", 2)]);

        let written = write_dir(&outcome(&request), &out).unwrap();

        assert_eq!(written.failures.len(), 1);
        assert_eq!(written.failures[0].invocation, "../../escaped");
        assert!(written.failures[0].message.contains("not a plain file name"));
        assert_eq!(written.paths.len(), 2);
        assert!(out.join("st-2-lint-180312a1b2.yaml").exists());
        assert!(out.join("revisionrun-a1b2c3d4e5.yaml").exists());
        assert!(!temp_dir.path().join("escaped-180312a1b2.yaml").exists());
    }

    #[test]
    fn test_is_plain_file_name() {
        assert!(is_plain_file_name("st-1-build-180312a1b2"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("st-1-a/b-180312a1b2"));
        assert!(!is_plain_file_name("st-1-a\\b-180312a1b2"));
    }
}
