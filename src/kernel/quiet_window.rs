use tracing::{debug, trace, warn};

use super::config::TtiConfig;
use super::error::TtiError;
use super::event::{Sample, SampleKind};
use super::time::Bucket;
use super::tracker::{TrackedSignal, Tracker};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchPoll {
    Pending,
    /// Corrected TTI in milliseconds, already clamped to >= 1.
    Interactive { tti_ms: f64, prerender_corrected: bool },
    Failed(TtiError),
}

/// Subtracts the prerender activation offset and clamps to 1ms.
pub fn apply_prerender_correction(raw_tti_ms: f64, offset_ms: Option<f64>) -> f64 {
    match offset_ms {
        Some(offset) if offset > 0.0 => (raw_tti_ms - offset).max(1.0),
        _ => raw_tti_ms.max(1.0),
    }
}

/// Scans buckets forward from the visually-ready point until a run of quiet
/// buckets long enough to call the page interactive.
///
/// Bucket evaluation is monotonic: `current_bucket` only moves forward and
/// each bucket is judged once.
#[derive(Debug)]
pub struct QuietWindowSearch {
    config: TtiConfig,
    tracker: Tracker,
    visually_ready: f64,
    start_bucket: Bucket,
    current_bucket: Bucket,
    accepted_intervals: u32,
    total_intervals: u64,
    prerender_offset: Option<f64>,
    outcome: Option<SearchPoll>,
}

impl QuietWindowSearch {
    /// Takes over a tracker that may already hold samples collected while
    /// visual readiness was still pending.
    pub fn new(visually_ready: f64, tracker: Tracker, config: TtiConfig) -> Self {
        let start_bucket = config.bucket_of(visually_ready);
        Self {
            config,
            tracker,
            visually_ready,
            start_bucket,
            current_bucket: start_bucket,
            accepted_intervals: 0,
            total_intervals: 0,
            prerender_offset: None,
            outcome: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn start_bucket(&self) -> Bucket {
        self.start_bucket
    }

    pub fn current_bucket(&self) -> Bucket {
        self.current_bucket
    }

    /// First offset wins; later navigations cannot move it.
    pub fn set_prerender_offset(&mut self, offset_ms: f64) {
        if self.prerender_offset.is_none() && offset_ms > 0.0 {
            self.prerender_offset = Some(offset_ms);
        }
    }

    pub fn record(&mut self, sample: &Sample) {
        if self.is_resolved() {
            trace!(?sample.kind, "sample after teardown ignored");
            return;
        }
        record_into(&mut self.tracker, &self.config, sample);
    }

    fn is_quiet(&self, bucket: Bucket) -> bool {
        let long_tasks_ok = self
            .tracker
            .count(TrackedSignal::LongTask, bucket)
            .map_or(true, |count| count <= self.config.long_task_threshold);
        if !long_tasks_ok {
            return false;
        }
        if !self.config.fps_enabled {
            return true;
        }
        self.tracker
            .count(TrackedSignal::Fps, bucket)
            .map_or(true, |frames| frames >= self.config.frames_per_bucket())
    }

    /// One periodic check against wall-clock `now_ms`. Once settled, every
    /// later check returns the settled outcome.
    pub fn check(&mut self, now_ms: f64) -> SearchPoll {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        self.total_intervals += 1;

        let waited_ms = self.total_intervals * self.config.check_period_ms;
        if waited_ms > self.config.tti_timeout_ms {
            warn!(waited_ms, accepted = self.accepted_intervals, "quiet window never found");
            return self.settle(SearchPoll::Failed(TtiError::SearchTimedOut { waited_ms }));
        }

        let end_bucket = self.config.bucket_of(now_ms);
        let required = self.config.required_accepted_intervals.max(1);
        while self.current_bucket <= end_bucket {
            let bucket = self.current_bucket;
            self.current_bucket = bucket.next();

            if !self.is_quiet(bucket) {
                self.accepted_intervals = 0;
                continue;
            }
            self.accepted_intervals += 1;
            if self.accepted_intervals < required {
                continue;
            }

            let window_start = bucket.index() + 1 - required as u64;
            let raw_tti = self.visually_ready
                + (window_start - self.start_bucket.index()) as f64
                    * self.config.collection_period_ms as f64;
            let tti_ms = apply_prerender_correction(raw_tti, self.prerender_offset);
            debug!(
                raw_tti,
                tti_ms,
                window_start,
                prerender_offset = ?self.prerender_offset,
                "quiet window found"
            );
            let prerender_corrected = self.prerender_offset.is_some();
            return self.settle(SearchPoll::Interactive {
                tti_ms,
                prerender_corrected,
            });
        }

        trace!(now_ms, accepted = self.accepted_intervals, next = self.current_bucket.index(), "quiet window pending");
        SearchPoll::Pending
    }

    fn settle(&mut self, outcome: SearchPoll) -> SearchPoll {
        self.tracker.clear();
        self.outcome = Some(outcome.clone());
        outcome
    }

    /// Stops the search and drops every counter. Safe to call repeatedly;
    /// an unsettled search settles as cancelled.
    pub fn cleanup(&mut self) {
        if self.outcome.is_none() {
            self.settle(SearchPoll::Failed(TtiError::Cancelled));
        }
    }
}

/// Long tasks mark the bucket of their start and of their end, nothing in
/// between. Frames count toward their own bucket when fps sampling is on.
pub(crate) fn record_into(tracker: &mut Tracker, config: &TtiConfig, sample: &Sample) {
    match sample.kind {
        SampleKind::LongTask => {
            tracker.increment(TrackedSignal::LongTask, config.bucket_of(sample.timestamp));
            tracker.increment(TrackedSignal::LongTask, config.bucket_of(sample.end_time()));
        }
        SampleKind::Frame if config.fps_enabled => {
            tracker.increment(TrackedSignal::Fps, config.bucket_of(sample.timestamp));
        }
        _ => {}
    }
}
