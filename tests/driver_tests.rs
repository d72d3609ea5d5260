use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;
use tti_kernel::kernel::collectors::{signal_channel, EnvironmentSupport};
use tti_kernel::kernel::config::TtiConfig;
use tti_kernel::kernel::event::{PaintEntry, PaintMetric, PaintName, TtiMetric};
use tti_kernel::compute_time_to_interactive;

fn paint(name: PaintName, start_time: f64) -> PaintMetric {
    PaintMetric {
        name,
        entries: vec![PaintEntry { start_time, duration: 0.0 }],
    }
}

#[tokio::test(start_paused = true)]
async fn test_driver_reports_through_callback() {
    let (sender, rx) = signal_channel();
    let (report_tx, report_rx) = oneshot::channel::<TtiMetric>();

    let handle = compute_time_to_interactive(
        move |metric| {
            let _ = report_tx.send(metric);
        },
        TtiConfig::default(),
        EnvironmentSupport::default(),
        rx,
        Instant::now(),
    )
    .expect("environment supports long tasks");

    // Host delivers the page-load signals before the first check
    sender.long_task(10.0, 50.0);
    sender.long_task(110.0, 60.0);
    sender.paint(paint(PaintName::Fcp, 150.0));
    sender.navigation(180.0, 0.0);
    sender.long_task(210.0, 60.0);
    sender.paint(paint(PaintName::Lcp, 212.0));

    let metric = report_rx.await.expect("report fires");
    assert_eq!(metric.value, 312);

    handle.finished().await;
    assert!(!sender.long_task(5000.0, 80.0), "Channel closes once settled");
}

#[tokio::test(start_paused = true)]
async fn test_late_start_uses_page_time() {
    // Navigation happened 12s before the computation is requested
    let navigation_start = Instant::now();
    tokio::time::sleep(Duration::from_millis(12_000)).await;

    let (sender, rx) = signal_channel();
    let (report_tx, report_rx) = oneshot::channel::<TtiMetric>();
    let handle = compute_time_to_interactive(
        move |metric| {
            let _ = report_tx.send(metric);
        },
        TtiConfig::default(),
        EnvironmentSupport::default(),
        rx,
        navigation_start,
    )
    .expect("environment supports long tasks");

    // Host timestamps are page time: bucket 120 and bucket 122 are busy
    sender.long_task(12_010.0, 50.0);
    sender.paint(paint(PaintName::Fcp, 12_150.0));
    sender.navigation(12_180.0, 0.0);
    sender.paint(paint(PaintName::Lcp, 12_212.0));
    sender.long_task(12_220.0, 60.0);

    let metric = report_rx.await.expect("quiet page reports even when requested late");
    assert_eq!(metric.value, 12_312, "Window opens at bucket 123");
    handle.finished().await;
}

#[tokio::test(start_paused = true)]
async fn test_driver_silent_without_signals() {
    let (_sender, rx) = signal_channel();
    let (report_tx, report_rx) = oneshot::channel::<TtiMetric>();

    let handle = compute_time_to_interactive(
        move |metric| {
            let _ = report_tx.send(metric);
        },
        TtiConfig::default(),
        EnvironmentSupport::default(),
        rx,
        Instant::now(),
    )
    .expect("environment supports long tasks");

    tokio::time::sleep(Duration::from_millis(12_000)).await;
    assert!(handle.is_finished(), "Gave up at the visually-ready timeout");
    handle.finished().await;
    assert!(report_rx.await.is_err(), "No report on failure");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_driver() {
    let (sender, rx) = signal_channel();
    let (report_tx, report_rx) = oneshot::channel::<TtiMetric>();

    let handle = compute_time_to_interactive(
        move |metric| {
            let _ = report_tx.send(metric);
        },
        TtiConfig::default(),
        EnvironmentSupport::default(),
        rx,
        Instant::now(),
    )
    .expect("environment supports long tasks");

    sender.paint(paint(PaintName::Fcp, 150.0));
    tokio::time::sleep(Duration::from_millis(1500)).await;

    handle.cancel();
    handle.cancel();
    handle.finished().await;

    assert!(report_rx.await.is_err());
    assert!(!sender.paint(paint(PaintName::Lcp, 212.0)), "Late signals are refused");
}

#[tokio::test]
async fn test_unsupported_environment_never_starts() {
    let (_sender, rx) = signal_channel();
    let support = EnvironmentSupport {
        long_tasks: false,
        ..EnvironmentSupport::default()
    };

    let handle = compute_time_to_interactive(|_| {}, TtiConfig::default(), support, rx, Instant::now());
    assert!(handle.is_none());
}
