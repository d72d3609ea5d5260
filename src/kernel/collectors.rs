use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{trace, warn};

use super::event::{HostSignal, LongTaskEntry, NavigationEntry, PaintMetric, PaintName, Sample};

/// Host buffer between signal sources and the detector. Frames dominate:
/// a 60Hz page produces ~60 per check period.
pub const SIGNAL_BUFFER: usize = 4096;

/// Which signal sources the host environment can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSupport {
    pub long_tasks: bool,
    pub frames: bool,
    pub fcp: bool,
    pub lcp: bool,
    pub navigation_timing: bool,
}

impl Default for EnvironmentSupport {
    fn default() -> Self {
        Self {
            long_tasks: true,
            frames: true,
            fcp: true,
            lcp: true,
            navigation_timing: true,
        }
    }
}

/// Normalizes raw host callbacks into samples, once per source where the
/// source is single-shot, and goes quiet when its owner has settled.
#[derive(Debug, Default)]
pub struct SignalCollectors {
    fps_enabled: bool,

    fcp_seen: bool,
    lcp_seen: bool,
    navigation_seen: bool,

    paint_closed: bool,
    timing_closed: bool,
}

/// What one host signal turned into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collected {
    pub sample: Sample,
    /// Activation offset, only on the first navigation of a prerendered page.
    pub prerender_offset: Option<f64>,
}

impl SignalCollectors {
    pub fn new(fps_enabled: bool) -> Self {
        Self {
            fps_enabled,
            ..Self::default()
        }
    }

    /// Paint listeners stop once visual readiness has settled.
    pub fn close_paint(&mut self) {
        self.paint_closed = true;
    }

    /// Long-task and frame listeners stop once the search has settled.
    pub fn close_timing(&mut self) {
        self.timing_closed = true;
    }

    pub fn close_all(&mut self) {
        self.close_paint();
        self.close_timing();
        self.navigation_seen = true;
    }

    /// False once the collector owning this kind of signal has stopped.
    pub fn accepts(&self, signal: &HostSignal) -> bool {
        match signal {
            HostSignal::LongTask(_) | HostSignal::Frame { .. } => !self.timing_closed,
            HostSignal::Navigation(_) => !self.navigation_seen,
            HostSignal::Paint(_) => !self.paint_closed,
        }
    }

    pub fn normalize(&mut self, signal: HostSignal) -> Option<Collected> {
        let sample = match signal {
            HostSignal::LongTask(LongTaskEntry { start_time, duration }) => {
                if self.timing_closed {
                    trace!("long task after search settled dropped");
                    return None;
                }
                Sample::long_task(start_time, duration)
            }
            HostSignal::Frame { timestamp } => {
                if self.timing_closed || !self.fps_enabled {
                    return None;
                }
                Sample::frame(timestamp)
            }
            HostSignal::Navigation(entry) => return self.on_navigation(entry),
            HostSignal::Paint(metric) => return self.on_paint(metric),
        };
        Some(Collected {
            sample,
            prerender_offset: None,
        })
    }

    /// The navigation entry also carries the prerender offset, which the
    /// search still needs after paint has closed, so it stays open until it
    /// has captured its one entry.
    fn on_navigation(&mut self, entry: NavigationEntry) -> Option<Collected> {
        if self.navigation_seen {
            return None;
        }
        self.navigation_seen = true;
        Some(Collected {
            sample: Sample::navigation(entry.dom_content_loaded_event_end),
            prerender_offset: entry.prerender_offset(),
        })
    }

    fn on_paint(&mut self, metric: PaintMetric) -> Option<Collected> {
        if self.paint_closed {
            trace!(?metric.name, "paint metric after visually ready dropped");
            return None;
        }
        let seen = match metric.name {
            PaintName::Fcp => &mut self.fcp_seen,
            PaintName::Lcp => &mut self.lcp_seen,
        };
        if *seen {
            return None;
        }
        let timestamp = metric.timestamp()?;
        *seen = true;
        Some(Collected {
            sample: Sample::paint(metric.name, timestamp),
            prerender_offset: None,
        })
    }
}

pub fn signal_channel() -> (SignalSender, mpsc::Receiver<HostSignal>) {
    let (tx, rx) = mpsc::channel(SIGNAL_BUFFER);
    (SignalSender { tx }, rx)
}

/// Host-adapter side of the detector. Never blocks: a full buffer or a
/// finished detector drops the signal.
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: mpsc::Sender<HostSignal>,
}

impl SignalSender {
    pub fn send(&self, signal: HostSignal) -> bool {
        match self.tx.try_send(signal) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(signal)) => {
                warn!(?signal, "signal buffer full, dropping");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    pub fn long_task(&self, start_time: f64, duration: f64) -> bool {
        self.send(HostSignal::LongTask(LongTaskEntry { start_time, duration }))
    }

    pub fn frame(&self, timestamp: f64) -> bool {
        self.send(HostSignal::Frame { timestamp })
    }

    pub fn navigation(&self, dom_content_loaded_event_end: f64, activation_start: f64) -> bool {
        self.send(HostSignal::Navigation(NavigationEntry {
            dom_content_loaded_event_end,
            activation_start,
        }))
    }

    pub fn paint(&self, metric: PaintMetric) -> bool {
        self.send(HostSignal::Paint(metric))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
