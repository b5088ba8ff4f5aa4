//! Output of the normalizer.

use chrono::{DateTime, Utc};
use kpp_core::Checkpoint;
use serde::Serialize;

/// Counters describing what happened to the raw features during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub features_read: usize,
    pub kept: usize,
    /// Features without a finite `Point` geometry.
    pub dropped_geometry: usize,
    /// Features that carried no identifier and received a generated one.
    pub synthesized_ids: usize,
    /// Features whose id repeated an earlier one and replaced it.
    pub duplicate_ids: usize,
}

/// The canonical, load-once checkpoint list plus dataset metadata.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub checkpoints: Vec<Checkpoint>,
    /// `metadata.updated_at`, falling back to `metadata.generated_at`.
    pub updated_at: Option<DateTime<Utc>>,
    pub report: NormalizeReport,
}
