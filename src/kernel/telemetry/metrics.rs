use std::collections::VecDeque;

use super::event::TelemetryEvent;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub started: u64,
    pub visually_ready: u64,
    pub partial_visually_ready: u64,
    pub reported: u64,
    pub failed: u64,
    pub dropped_signals: u64,
    pub last_visually_ready: Option<f64>,
    pub last_value: Option<u64>,
    pub last_failure: Option<String>,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::Started { .. } => snap.started += 1,
            TelemetryEvent::VisuallyReady { timestamp, partial, .. } => {
                snap.visually_ready += 1;
                if *partial {
                    snap.partial_visually_ready += 1;
                }
                snap.last_visually_ready = Some(*timestamp);
            }
            TelemetryEvent::Interactive { value, .. } => {
                snap.reported += 1;
                snap.last_value = Some(*value);
            }
            TelemetryEvent::Failed { reason, .. } => {
                snap.failed += 1;
                snap.last_failure = Some(reason.clone());
            }
            TelemetryEvent::SignalDropped { .. } => snap.dropped_signals += 1,
        }
    }

    snap
}
