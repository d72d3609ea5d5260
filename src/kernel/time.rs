use serde::{Deserialize, Serialize};

/// Width of one tracker bucket.
pub const COLLECTION_PERIOD_MS: u64 = 100;
/// Cadence of every periodic check (resolver and search).
pub const CHECK_PERIOD_MS: u64 = 1000;

pub const REQUIRED_ACCEPTED_INTERVALS: u32 = 5;
pub const LONG_TASK_THRESHOLD: u32 = 0;
pub const MIN_FPS: u32 = 20;
/// MIN_FPS scaled to one bucket: 2 frames per 100ms.
pub const FPS_THRESHOLD: u32 = MIN_FPS * COLLECTION_PERIOD_MS as u32 / 1000;

pub const VISUALLY_READY_RESOLVE_TIMEOUT_MS: u64 = 10_000;
pub const TTI_RESOLVE_TIMEOUT_MS: u64 = 10_000;

/// A fixed-width slot of page time. Index 0 covers [0, 100ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bucket(pub u64);

impl Bucket {
    /// Bucket containing `time_ms` for the default collection period.
    pub fn of(time_ms: f64) -> Self {
        Self::with_period(time_ms, COLLECTION_PERIOD_MS)
    }

    /// Negative or non-finite times land in bucket 0.
    pub fn with_period(time_ms: f64, period_ms: u64) -> Self {
        if !time_ms.is_finite() || time_ms <= 0.0 || period_ms == 0 {
            return Bucket(0);
        }
        Bucket((time_ms / period_ms as f64).floor() as u64)
    }

    pub fn index(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Bucket(self.0 + 1)
    }
}
