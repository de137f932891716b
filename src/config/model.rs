//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for manifest rendering.
///
/// This struct represents the contents of `stagetime.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Manifest settings
    // =========================================================================
    /// Namespace manifests are created in. `PIPELINE_WORKSPACE` overrides it.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Service account every pipeline run uses.
    #[serde(default = "default_service_account")]
    pub service_account: String,

    /// Pipeline run timeout (e.g. "1h", "30m").
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Prefix of every manifest name.
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,

    // =========================================================================
    // Template settings
    // =========================================================================
    /// Replacement for the built-in pipeline run template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_template: Option<PathBuf>,

    /// Replacement for the built-in tracking document template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_template: Option<PathBuf>,

    // =========================================================================
    // Event log settings
    // =========================================================================
    /// NDJSON event log to append render events to (disabled when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            service_account: default_service_account(),
            timeout: default_timeout(),
            name_prefix: default_name_prefix(),
            manifest_template: None,
            tracking_template: None,
            events_file: None,
        }
    }
}
