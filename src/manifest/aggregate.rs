//! Stage bucketing of rendered manifests.

use super::renderer::RenderedManifest;
use serde::Serialize;
use std::collections::BTreeMap;

/// Rendered manifests grouped by stage, plus every distinct stage label.
///
/// Append-only: manifests keep the order they were pushed in, and stage
/// labels keep first-seen order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageBucketResult {
    buckets: BTreeMap<i64, Vec<RenderedManifest>>,
    stages: Vec<String>,
}

impl StageBucketResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stage label if it has not been seen yet.
    pub fn record_stage(&mut self, label: &str) {
        if !self.stages.iter().any(|s| s == label) {
            self.stages.push(label.to_string());
        }
    }

    /// Append a manifest to its stage bucket.
    pub fn push(&mut self, manifest: RenderedManifest) {
        self.record_stage(&manifest.stage.to_string());
        self.buckets.entry(manifest.stage).or_default().push(manifest);
    }

    /// Buckets keyed by stage number, in ascending stage order.
    pub fn buckets(&self) -> &BTreeMap<i64, Vec<RenderedManifest>> {
        &self.buckets
    }

    /// Manifests of one stage, in submission order.
    pub fn bucket(&self, stage: i64) -> &[RenderedManifest] {
        self.buckets.get(&stage).map(Vec::as_slice).unwrap_or_default()
    }

    /// Distinct stage labels, first-seen order.
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Total number of manifests across all buckets.
    pub fn manifest_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// All manifests, ascending by stage then submission order.
    pub fn manifests(&self) -> impl Iterator<Item = &RenderedManifest> {
        self.buckets.values().flatten()
    }
}

impl FromIterator<RenderedManifest> for StageBucketResult {
    fn from_iter<I: IntoIterator<Item = RenderedManifest>>(iter: I) -> Self {
        let mut result = Self::new();
        for manifest in iter {
            result.push(manifest);
        }
        result
    }
}
