//! Manifest and tracking-document naming.
//!
//! Manifest names have the shape `{prefix}-{stage}-{invocation}-{suffix}`,
//! e.g. `st-1-build-kaniko-180312a1b2`, where the suffix is the render time
//! as day-of-month, minute and second followed by the first four characters
//! of the commit id. Tracking documents are named `revisionrun-{commit}`.
//!
//! Two invocations sharing both stage and name inside the same second of the
//! same request produce the same name. Nothing here disambiguates them.

use crate::error::{Result, StageTimeError};
use chrono::{DateTime, Utc};

/// Default manifest name prefix.
pub const DEFAULT_NAME_PREFIX: &str = "st";

/// Prefix of the tracking document name.
pub const TRACKING_NAME_PREFIX: &str = "revisionrun";

/// `%d%M%S`: zero-padded day of month, minute, second.
const SUFFIX_TIME_FORMAT: &str = "%d%M%S";

/// Number of commit id characters embedded in the suffix.
const COMMIT_FRAGMENT_LEN: usize = 4;

/// Compute the name suffix for every manifest rendered at `now`.
///
/// # Errors
///
/// `InvalidIdentity` if the commit id is shorter than four characters.
pub fn name_suffix(commit_id: &str, now: &DateTime<Utc>) -> Result<String> {
    let fragment = commit_fragment(commit_id)?;
    Ok(format!("{}{}", now.format(SUFFIX_TIME_FORMAT), fragment))
}

/// Assemble a manifest name from its parts.
pub fn manifest_name(prefix: &str, stage: &str, invocation: &str, suffix: &str) -> String {
    format!("{}-{}-{}-{}", prefix, stage, invocation, suffix)
}

/// Name of the tracking document for a commit.
pub fn tracking_document_name(commit_id: &str) -> String {
    format!("{}-{}", TRACKING_NAME_PREFIX, commit_id)
}

/// The first four characters of a commit id.
fn commit_fragment(commit_id: &str) -> Result<&str> {
    match commit_id.char_indices().nth(COMMIT_FRAGMENT_LEN) {
        Some((end, _)) => Ok(&commit_id[..end]),
        None if commit_id.chars().count() == COMMIT_FRAGMENT_LEN => Ok(commit_id),
        None => Err(StageTimeError::InvalidIdentity(format!(
            "commit id '{}' is shorter than {} characters",
            commit_id, COMMIT_FRAGMENT_LEN
        ))),
    }
}
