use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

/// Page time in milliseconds since the time origin (navigation start).
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Clock anchored at a tokio `Instant`, so paused test runtimes drive it too.
#[derive(Debug, Clone, Copy)]
pub struct PageClock {
    origin: Instant,
}

impl PageClock {
    /// `origin` is navigation start: host timestamps share this time base.
    pub fn with_origin(origin: Instant) -> Self {
        Self { origin }
    }
}

impl Clock for PageClock {
    fn now_ms(&self) -> f64 {
        Instant::now().duration_since(self.origin).as_secs_f64() * 1000.0
    }
}

/// Repeating check timer. The first tick fires one full period after
/// creation, like a host `setInterval`.
pub fn check_cadence(period_ms: u64) -> Interval {
    let period = Duration::from_millis(period_ms.max(1));
    let mut cadence = interval_at(Instant::now() + period, period);
    cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);
    cadence
}
