//! Offline replay of a recorded signal trace through the detector on
//! virtual time.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::kernel::collectors::EnvironmentSupport;
use crate::kernel::config::TtiConfig;
use crate::kernel::detector::{DetectorStep, TtiDetector};
use crate::kernel::event::{HostSignal, TtiMetric};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedSignal {
    /// Page time at which the host delivered the signal.
    pub at: f64,
    pub signal: HostSignal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalTrace {
    pub config: TtiConfig,
    pub environment: EnvironmentSupport,
    pub signals: Vec<TimedSignal>,
}

impl SignalTrace {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("malformed signal trace")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub step: DetectorStep,
    /// What the report callback received, if it fired.
    pub reported: Option<TtiMetric>,
    pub visually_ready: Option<f64>,
    /// Virtual time of the last check.
    pub ended_at_ms: f64,
}

/// Steps the detector one check period at a time, delivering each signal on
/// the first tick at or after its `at`. Stops when the detector settles or
/// both phases have certainly timed out.
pub fn replay(trace: &SignalTrace) -> Result<ReplayOutcome> {
    let reported = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&reported);
    let mut detector = TtiDetector::new(
        Box::new(move |metric: TtiMetric| {
            if let Ok(mut slot) = sink.lock() {
                *slot = Some(metric);
            }
        }),
        trace.config.clone(),
        trace.environment,
    )?;

    let mut pending = trace.signals.clone();
    pending.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut pending = pending.into_iter().peekable();

    let period = trace.config.check_period_ms.max(1);
    let horizon = trace.config.visually_ready_timeout_ms + trace.config.tti_timeout_ms + 2 * period;
    let mut now = 0u64;
    let mut step = DetectorStep::Pending;

    while now <= horizon {
        now += period;
        let mut due = Vec::new();
        while let Some(timed) = pending.next_if(|timed| timed.at <= now as f64) {
            due.push(timed.signal);
        }
        step = detector.tick_step(now as f64, due);
        if step != DetectorStep::Pending {
            break;
        }
    }

    let reported = *reported
        .lock()
        .map_err(|_| anyhow::anyhow!("report sink poisoned"))?;
    Ok(ReplayOutcome {
        step,
        reported,
        visually_ready: detector.visually_ready(),
        ended_at_ms: now as f64,
    })
}
