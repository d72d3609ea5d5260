use serde::{Deserialize, Serialize};

use super::time::{
    Bucket, CHECK_PERIOD_MS, COLLECTION_PERIOD_MS, LONG_TASK_THRESHOLD, MIN_FPS,
    REQUIRED_ACCEPTED_INTERVALS, TTI_RESOLVE_TIMEOUT_MS, VISUALLY_READY_RESOLVE_TIMEOUT_MS,
};

/// Knobs for one TTI computation. Every field defaults to the stock constant,
/// so a partial JSON document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtiConfig {
    /// Require a minimum frame rate in each quiet bucket.
    pub fps_enabled: bool,
    pub collection_period_ms: u64,
    pub check_period_ms: u64,
    pub required_accepted_intervals: u32,
    pub long_task_threshold: u32,
    pub min_fps: u32,
    pub visually_ready_timeout_ms: u64,
    pub tti_timeout_ms: u64,
}

impl Default for TtiConfig {
    fn default() -> Self {
        Self {
            fps_enabled: false,
            collection_period_ms: COLLECTION_PERIOD_MS,
            check_period_ms: CHECK_PERIOD_MS,
            required_accepted_intervals: REQUIRED_ACCEPTED_INTERVALS,
            long_task_threshold: LONG_TASK_THRESHOLD,
            min_fps: MIN_FPS,
            visually_ready_timeout_ms: VISUALLY_READY_RESOLVE_TIMEOUT_MS,
            tti_timeout_ms: TTI_RESOLVE_TIMEOUT_MS,
        }
    }
}

impl TtiConfig {
    pub fn with_fps(fps_enabled: bool) -> Self {
        Self {
            fps_enabled,
            ..Self::default()
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Minimum frames a bucket must hold to count as smooth.
    pub fn frames_per_bucket(&self) -> u32 {
        (self.min_fps as u64 * self.collection_period_ms / 1000) as u32
    }

    pub fn bucket_of(&self, time_ms: f64) -> Bucket {
        Bucket::with_period(time_ms, self.collection_period_ms)
    }
}
