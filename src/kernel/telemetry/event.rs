use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kernel::event::TtiMetric;

pub const TIME_TO_INTERACTIVE_EVENT_TYPE: &str = "time_to_interactive_event";
pub const TIME_TO_INTERACTIVE_EVENT_VERSION: &str = "1.0.0";

/// What the detector went through, one record per transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TelemetryEvent {
    Started {
        computation: Uuid,
        fps_enabled: bool,
    },
    VisuallyReady {
        computation: Uuid,
        timestamp: f64,
        partial: bool,
    },
    Interactive {
        computation: Uuid,
        value: u64,
        prerender_corrected: bool,
    },
    Failed {
        computation: Uuid,
        reason: String,
    },
    SignalDropped {
        computation: Uuid,
        signal: SignalKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    LongTask,
    Frame,
    Navigation,
    Paint,
}

/// The record a consuming plugin attaches to the outgoing event batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeToInteractiveEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub version: String,
    pub value: u64,
}

impl From<TtiMetric> for TimeToInteractiveEvent {
    fn from(metric: TtiMetric) -> Self {
        Self {
            event_type: TIME_TO_INTERACTIVE_EVENT_TYPE.to_string(),
            version: TIME_TO_INTERACTIVE_EVENT_VERSION.to_string(),
            value: metric.value,
        }
    }
}
