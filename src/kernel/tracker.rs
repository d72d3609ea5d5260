use std::collections::BTreeMap;

use super::time::Bucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedSignal {
    LongTask,
    Fps,
}

/// Sparse per-bucket counters for the quiet-window search.
/// A bucket nobody wrote to reads as `None`, which is distinct from zero.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    long_tasks: BTreeMap<Bucket, u32>,
    frames: BTreeMap<Bucket, u32>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn series(&self, signal: TrackedSignal) -> &BTreeMap<Bucket, u32> {
        match signal {
            TrackedSignal::LongTask => &self.long_tasks,
            TrackedSignal::Fps => &self.frames,
        }
    }

    fn series_mut(&mut self, signal: TrackedSignal) -> &mut BTreeMap<Bucket, u32> {
        match signal {
            TrackedSignal::LongTask => &mut self.long_tasks,
            TrackedSignal::Fps => &mut self.frames,
        }
    }

    pub fn increment(&mut self, signal: TrackedSignal, bucket: Bucket) {
        *self.series_mut(signal).entry(bucket).or_insert(0) += 1;
    }

    /// Overwrites a bucket's count. Replay fixtures use this to state
    /// explicit zeros.
    pub fn set(&mut self, signal: TrackedSignal, bucket: Bucket, count: u32) {
        self.series_mut(signal).insert(bucket, count);
    }

    pub fn count(&self, signal: TrackedSignal, bucket: Bucket) -> Option<u32> {
        self.series(signal).get(&bucket).copied()
    }

    /// Seeds consecutive buckets from index 0, like a dense fixture array.
    pub fn seed(&mut self, signal: TrackedSignal, counts: &[u32]) {
        for (index, count) in counts.iter().enumerate() {
            self.set(signal, Bucket(index as u64), *count);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.long_tasks.is_empty() && self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.long_tasks.clear();
        self.frames.clear();
    }
}
