//! Configuration constants and defaults for stagetime.

use crate::naming::DEFAULT_NAME_PREFIX;

/// Environment variable holding the namespace pipeline runs are created in.
pub const NAMESPACE_ENV: &str = "PIPELINE_WORKSPACE";

// Default value functions for serde
pub(crate) fn default_namespace() -> String {
    "default".to_string()
}
pub(crate) fn default_service_account() -> String {
    "default".to_string()
}
pub(crate) fn default_timeout() -> String {
    "1h".to_string()
}
pub(crate) fn default_name_prefix() -> String {
    DEFAULT_NAME_PREFIX.to_string()
}
