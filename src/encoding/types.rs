//! Decoded parameter and workspace types.

use serde::Serialize;
use std::collections::BTreeMap;

/// Scalar parameters keyed by name.
///
/// Ordered by key so rendered manifests are stable across runs.
pub type ParsedParams = BTreeMap<String, String>;

/// List parameters keyed by name; each value sequence keeps encoding order.
pub type ParsedListParams = BTreeMap<String, Vec<String>>;

/// A workspace bound to a pipeline run.
///
/// Decoded from `name=kind;short-name;reference`, e.g.
/// `source=persistentVolumeClaim;claimName;git-pvc`.
///
/// Serializes with `Name`, `Kind`, `ShortName`, `Reference` keys, which is
/// how manifest templates address it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkspaceBinding {
    /// Workspace name as declared by the pipeline.
    pub name: String,
    /// Volume source kind, used as the nested key in the manifest
    /// (e.g. `persistentVolumeClaim`, `secret`, `configMap`).
    pub kind: String,
    /// Field name inside the kind block (e.g. `claimName`, `secretName`).
    pub short_name: String,
    /// The referenced object's name.
    pub reference: String,
}

impl WorkspaceBinding {
    /// Create a new workspace binding.
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        short_name: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            short_name: short_name.into(),
            reference: reference.into(),
        }
    }
}
