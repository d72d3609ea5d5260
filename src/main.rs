use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tti_kernel::kernel::detector::DetectorStep;
use tti_kernel::kernel::telemetry::event::TimeToInteractiveEvent;
use tti_kernel::replay::{replay, SignalTrace};

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let path = std::env::args()
        .nth(1)
        .context("usage: tti_kernel <signal-trace.json>")?;
    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let trace = SignalTrace::from_json(&raw)?;

    tracing::info!("Replaying {} signals from {}", trace.signals.len(), path);
    let outcome = replay(&trace)?;

    match (outcome.step, outcome.reported) {
        (DetectorStep::Reported(_), Some(metric)) => {
            let event = TimeToInteractiveEvent::from(metric);
            println!("{}", serde_json::to_string(&event)?);
        }
        (step, _) => {
            tracing::info!("Detector ended at {}ms with {:?}", outcome.ended_at_ms, step);
            println!("no TTI available");
        }
    }
    Ok(())
}
