use tracing::{debug, warn};

use super::collectors::EnvironmentSupport;
use super::config::TtiConfig;
use super::error::TtiError;
use super::event::{PaintName, Sample, SampleKind};

#[derive(Debug, Clone, PartialEq)]
pub enum ResolverPoll {
    Pending,
    /// `partial` is set when the timeout forced resolution before every
    /// supported signal arrived.
    Ready { timestamp: f64, partial: bool },
    Failed(TtiError),
}

/// Decides when the page became visually usable: the latest of FCP, LCP and
/// DOMContentLoaded end, waiting for every signal the environment supports.
#[derive(Debug)]
pub struct VisuallyReadyResolver {
    support: EnvironmentSupport,
    check_period_ms: u64,
    timeout_ms: u64,

    fcp: Option<f64>,
    lcp: Option<f64>,
    dom_content_loaded_end: Option<f64>,

    checks: u64,
    outcome: Option<ResolverPoll>,
}

impl VisuallyReadyResolver {
    pub fn new(support: EnvironmentSupport, config: &TtiConfig) -> Self {
        Self {
            support,
            check_period_ms: config.check_period_ms,
            timeout_ms: config.visually_ready_timeout_ms,
            fcp: None,
            lcp: None,
            dom_content_loaded_end: None,
            checks: 0,
            outcome: None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.outcome.is_some()
    }

    /// Resolved value, once there is one. Write-once.
    pub fn visually_ready(&self) -> Option<f64> {
        match self.outcome {
            Some(ResolverPoll::Ready { timestamp, .. }) => Some(timestamp),
            _ => None,
        }
    }

    /// Keeps the first value per signal. Non-paint samples are not ours.
    pub fn on_sample(&mut self, sample: &Sample) {
        if self.is_settled() {
            return;
        }
        let slot = match sample.kind {
            SampleKind::Paint(PaintName::Fcp) => &mut self.fcp,
            SampleKind::Paint(PaintName::Lcp) => &mut self.lcp,
            SampleKind::Navigation => &mut self.dom_content_loaded_end,
            SampleKind::LongTask | SampleKind::Frame => return,
        };
        if slot.is_none() {
            *slot = Some(sample.timestamp);
        }
    }

    fn any_arrived(&self) -> bool {
        self.fcp.is_some() || self.lcp.is_some() || self.dom_content_loaded_end.is_some()
    }

    /// Unsupported signals never block; a supported one blocks until it lands.
    fn all_supported_arrived(&self) -> bool {
        let waiting = [
            (self.support.fcp, self.fcp),
            (self.support.lcp, self.lcp),
            (self.support.navigation_timing, self.dom_content_loaded_end),
        ];
        let mut supported = waiting.iter().filter(|(supported, _)| *supported).peekable();
        supported.peek().is_some() && supported.all(|(_, value)| value.is_some())
    }

    fn value(&self) -> f64 {
        self.fcp
            .unwrap_or(0.0)
            .max(self.lcp.unwrap_or(0.0))
            .max(self.dom_content_loaded_end.unwrap_or(0.0))
    }

    /// One periodic check. `now_ms` only feeds logs; the timeout counts checks
    /// so a stalled host clock cannot stretch it.
    pub fn check(&mut self, now_ms: f64) -> ResolverPoll {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        self.checks += 1;

        let outcome = if self.all_supported_arrived() {
            debug!(now_ms, fcp = ?self.fcp, lcp = ?self.lcp, dcl = ?self.dom_content_loaded_end, "visually ready: all signals arrived");
            ResolverPoll::Ready {
                timestamp: self.value(),
                partial: false,
            }
        } else if self.checks * self.check_period_ms >= self.timeout_ms {
            let waited_ms = self.checks * self.check_period_ms;
            if self.any_arrived() {
                debug!(now_ms, waited_ms, "visually ready: resolving from partial signals");
                ResolverPoll::Ready {
                    timestamp: self.value(),
                    partial: true,
                }
            } else {
                warn!(waited_ms, "visually ready: no signal arrived");
                ResolverPoll::Failed(TtiError::NoVisuallyReadySignal { waited_ms })
            }
        } else {
            return ResolverPoll::Pending;
        };

        self.outcome = Some(outcome.clone());
        outcome
    }
}
