use serde::{Deserialize, Serialize};

/// A span of main-thread work reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LongTaskEntry {
    pub start_time: f64,
    pub duration: f64,
}

/// Navigation timing, delivered once per navigation.
/// `activation_start > 0` iff the page was prerendered before activation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub dom_content_loaded_event_end: f64,
    #[serde(default)]
    pub activation_start: f64,
}

impl NavigationEntry {
    pub fn prerender_offset(&self) -> Option<f64> {
        (self.activation_start > 0.0).then_some(self.activation_start)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaintName {
    Fcp,
    Lcp,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaintEntry {
    pub start_time: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintMetric {
    pub name: PaintName,
    pub entries: Vec<PaintEntry>,
}

impl PaintMetric {
    /// First reported entry, for either metric.
    pub fn timestamp(&self) -> Option<f64> {
        self.entries.first().map(|entry| entry.start_time)
    }
}

/// Raw host callbacks, as delivered by the signal sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostSignal {
    LongTask(LongTaskEntry),
    Frame { timestamp: f64 },
    Navigation(NavigationEntry),
    Paint(PaintMetric),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleKind {
    LongTask,
    Frame,
    Navigation,
    Paint(PaintName),
}

/// A normalized, timestamped observation. Produced once, consumed by exactly
/// one resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub kind: SampleKind,
    pub timestamp: f64,
    pub duration: Option<f64>,
}

impl Sample {
    pub fn long_task(start_time: f64, duration: f64) -> Self {
        Self {
            kind: SampleKind::LongTask,
            timestamp: start_time,
            duration: Some(duration),
        }
    }

    pub fn frame(timestamp: f64) -> Self {
        Self {
            kind: SampleKind::Frame,
            timestamp,
            duration: None,
        }
    }

    pub fn navigation(dom_content_loaded_end: f64) -> Self {
        Self {
            kind: SampleKind::Navigation,
            timestamp: dom_content_loaded_end,
            duration: None,
        }
    }

    pub fn paint(name: PaintName, timestamp: f64) -> Self {
        Self {
            kind: SampleKind::Paint(name),
            timestamp,
            duration: None,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.timestamp + self.duration.unwrap_or(0.0)
    }
}

/// The single value handed to the report callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtiMetric {
    pub value: u64,
}

impl TtiMetric {
    /// Rounds to whole milliseconds; never below 1.
    pub fn from_ms(tti_ms: f64) -> Self {
        Self {
            value: (tti_ms.round() as u64).max(1),
        }
    }
}
