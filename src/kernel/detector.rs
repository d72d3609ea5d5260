use std::mem;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use super::cancel::TtiHandle;
use super::collectors::{EnvironmentSupport, SignalCollectors};
use super::config::TtiConfig;
use super::error::TtiError;
use super::event::{HostSignal, Sample, SampleKind, TtiMetric};
use super::quiet_window::{record_into, QuietWindowSearch, SearchPoll};
use super::scheduler::{check_cadence, Clock, PageClock};
use super::telemetry::event::{SignalKind, TelemetryEvent};
use super::telemetry::recorder::TelemetryRecorder;
use super::tracker::Tracker;
use super::visually_ready::{ResolverPoll, VisuallyReadyResolver};

pub type ReportCallback = Box<dyn FnOnce(TtiMetric) + Send>;

#[derive(Debug, Clone, PartialEq)]
pub enum DetectorStep {
    Pending,
    Reported(TtiMetric),
    Failed(TtiError),
}

enum Phase {
    /// Long tasks and frames are already tracked while paint settles.
    AwaitingVisuallyReady { tracker: Tracker },
    Searching(QuietWindowSearch),
    Settled(DetectorStep),
}

/// One TTI computation: visual readiness first, then the quiet-window search.
///
/// `tick_step` is the pure core and never awaits; `run` is the driver that
/// feeds it from a check cadence. A detector is single-use.
pub struct TtiDetector {
    pub id: Uuid,
    config: TtiConfig,
    collectors: SignalCollectors,
    resolver: VisuallyReadyResolver,
    phase: Phase,
    prerender_offset: Option<f64>,
    on_report: Option<ReportCallback>,
    pub telemetry: TelemetryRecorder,
}

impl TtiDetector {
    /// Refuses to build when the host has no long-task signal.
    pub fn new(
        on_report: ReportCallback,
        mut config: TtiConfig,
        support: EnvironmentSupport,
    ) -> Result<Self, TtiError> {
        if !support.long_tasks {
            return Err(TtiError::EnvironmentUnsupported);
        }
        config.fps_enabled &= support.frames;

        let id = Uuid::new_v4();
        let mut telemetry = TelemetryRecorder::new();
        telemetry.record(TelemetryEvent::Started {
            computation: id,
            fps_enabled: config.fps_enabled,
        });

        Ok(Self {
            id,
            collectors: SignalCollectors::new(config.fps_enabled),
            resolver: VisuallyReadyResolver::new(support, &config),
            phase: Phase::AwaitingVisuallyReady {
                tracker: Tracker::new(),
            },
            config,
            prerender_offset: None,
            on_report: Some(on_report),
            telemetry,
        })
    }

    pub fn config(&self) -> &TtiConfig {
        &self.config
    }

    pub fn visually_ready(&self) -> Option<f64> {
        self.resolver.visually_ready()
    }

    pub fn search(&self) -> Option<&QuietWindowSearch> {
        match &self.phase {
            Phase::Searching(search) => Some(search),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Settled(_))
    }

    /// One check: route the signals gathered since the last tick, then
    /// advance whichever phase is active.
    pub fn tick_step(&mut self, now_ms: f64, signals: Vec<HostSignal>) -> DetectorStep {
        if let Phase::Settled(step) = &self.phase {
            return step.clone();
        }

        for signal in signals {
            self.ingest(signal);
        }

        match &mut self.phase {
            Phase::AwaitingVisuallyReady { tracker } => match self.resolver.check(now_ms) {
                ResolverPoll::Pending => DetectorStep::Pending,
                ResolverPoll::Ready { timestamp, partial } => {
                    self.telemetry.record(TelemetryEvent::VisuallyReady {
                        computation: self.id,
                        timestamp,
                        partial,
                    });
                    self.collectors.close_paint();

                    let tracker = mem::take(tracker);
                    let mut search = QuietWindowSearch::new(timestamp, tracker, self.config.clone());
                    if let Some(offset) = self.prerender_offset {
                        search.set_prerender_offset(offset);
                    }
                    debug!(timestamp, partial, start_bucket = search.start_bucket().index(), "quiet-window search armed");
                    self.phase = Phase::Searching(search);
                    DetectorStep::Pending
                }
                ResolverPoll::Failed(e) => self.settle(DetectorStep::Failed(e)),
            },
            Phase::Searching(search) => match search.check(now_ms) {
                SearchPoll::Pending => DetectorStep::Pending,
                SearchPoll::Interactive {
                    tti_ms,
                    prerender_corrected,
                } => {
                    let metric = TtiMetric::from_ms(tti_ms);
                    self.telemetry.record(TelemetryEvent::Interactive {
                        computation: self.id,
                        value: metric.value,
                        prerender_corrected,
                    });
                    let step = self.settle(DetectorStep::Reported(metric));
                    if let Some(report) = self.on_report.take() {
                        info!(value = metric.value, "time to interactive");
                        report(metric);
                    }
                    step
                }
                SearchPoll::Failed(e) => self.settle(DetectorStep::Failed(e)),
            },
            Phase::Settled(step) => step.clone(),
        }
    }

    fn ingest(&mut self, signal: HostSignal) {
        if !self.collectors.accepts(&signal) {
            let kind = match signal {
                HostSignal::LongTask(_) => SignalKind::LongTask,
                HostSignal::Frame { .. } => SignalKind::Frame,
                HostSignal::Navigation(_) => SignalKind::Navigation,
                HostSignal::Paint(_) => SignalKind::Paint,
            };
            self.telemetry.record(TelemetryEvent::SignalDropped {
                computation: self.id,
                signal: kind,
            });
            return;
        }
        let Some(collected) = self.collectors.normalize(signal) else {
            return;
        };

        if let (None, Some(offset)) = (self.prerender_offset, collected.prerender_offset) {
            self.prerender_offset = Some(offset);
            if let Phase::Searching(search) = &mut self.phase {
                search.set_prerender_offset(offset);
            }
        }
        self.route(&collected.sample);
    }

    fn route(&mut self, sample: &Sample) {
        match sample.kind {
            SampleKind::Paint(_) | SampleKind::Navigation => self.resolver.on_sample(sample),
            SampleKind::LongTask | SampleKind::Frame => match &mut self.phase {
                Phase::AwaitingVisuallyReady { tracker } => record_into(tracker, &self.config, sample),
                Phase::Searching(search) => search.record(sample),
                Phase::Settled(_) => {}
            },
        }
    }

    fn settle(&mut self, step: DetectorStep) -> DetectorStep {
        if let Phase::Searching(search) = &mut self.phase {
            search.cleanup();
        }
        if let DetectorStep::Failed(e) = &step {
            debug!(reason = e.reason(), "TTI computation failed: {}", e);
            self.telemetry.record(TelemetryEvent::Failed {
                computation: self.id,
                reason: e.reason().to_string(),
            });
            self.on_report = None;
        }
        self.collectors.close_all();
        self.phase = Phase::Settled(step.clone());
        step
    }

    /// Explicit teardown. A settled detector is left as it is.
    pub fn cleanup(&mut self) {
        if self.is_settled() {
            return;
        }
        self.settle(DetectorStep::Failed(TtiError::Cancelled));
    }

    /// Async driver: one `tick_step` per check period until settled or
    /// cancelled.
    pub async fn run<C: Clock>(
        mut self,
        mut receiver: mpsc::Receiver<HostSignal>,
        clock: C,
        cancel: CancellationToken,
    ) -> DetectorStep {
        debug!(check_period_ms = self.config.check_period_ms, "TTI detector started");
        let mut cadence = check_cadence(self.config.check_period_ms);

        let step = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.cleanup();
                    break DetectorStep::Failed(TtiError::Cancelled);
                }
                _ = cadence.tick() => {}
            }

            let mut signals = Vec::new();
            while let Ok(signal) = receiver.try_recv() {
                signals.push(signal);
            }

            match self.tick_step(clock.now_ms(), signals) {
                DetectorStep::Pending => continue,
                settled => break settled,
            }
        };

        // Host adapters see a closed channel from here on.
        receiver.close();
        step
    }
}

/// Starts a computation on the current tokio runtime and returns at once.
///
/// `on_report` fires at most once, with the rounded TTI. It never fires on
/// failure, and `None` comes back when the environment lacks a long-task
/// signal, in which case nothing is started.
///
/// `navigation_start` anchors page time, so a computation requested late in
/// the page's life (e.g. after prerender activation) still scans the buckets
/// its host timestamps fall in.
pub fn compute_time_to_interactive<F>(
    on_report: F,
    config: TtiConfig,
    support: EnvironmentSupport,
    signals: mpsc::Receiver<HostSignal>,
    navigation_start: Instant,
) -> Option<TtiHandle>
where
    F: FnOnce(TtiMetric) + Send + 'static,
{
    let clock = PageClock::with_origin(navigation_start);
    spawn_detector(on_report, config, support, signals, clock)
}

/// As [`compute_time_to_interactive`], with an explicit page clock.
pub fn spawn_detector<F, C>(
    on_report: F,
    config: TtiConfig,
    support: EnvironmentSupport,
    signals: mpsc::Receiver<HostSignal>,
    clock: C,
) -> Option<TtiHandle>
where
    F: FnOnce(TtiMetric) + Send + 'static,
    C: Clock + 'static,
{
    let detector = match TtiDetector::new(Box::new(on_report), config, support) {
        Ok(detector) => detector,
        Err(e) => {
            debug!("TTI computation not started: {}", e);
            return None;
        }
    };

    let id = detector.id;
    let token = CancellationToken::new();
    let span = info_span!("tti", computation = %id);
    let driver_token = token.clone();
    let task = tokio::spawn(
        async move {
            let _ = detector.run(signals, clock, driver_token).await;
        }
        .instrument(span),
    );
    Some(TtiHandle::new(id, token, task))
}
