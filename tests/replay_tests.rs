use tti_kernel::kernel::config::TtiConfig;
use tti_kernel::kernel::detector::DetectorStep;
use tti_kernel::kernel::error::TtiError;
use tti_kernel::kernel::event::TtiMetric;
use tti_kernel::kernel::telemetry::event::TimeToInteractiveEvent;
use tti_kernel::replay::{replay, SignalTrace};

const PAGE_LOAD: &str = r#"{
    "config": { "fps_enabled": false },
    "signals": [
        { "at": 60,  "signal": { "type": "long_task", "start_time": 10, "duration": 50 } },
        { "at": 170, "signal": { "type": "long_task", "start_time": 110, "duration": 60 } },
        { "at": 150, "signal": { "type": "paint", "name": "FCP", "entries": [{ "start_time": 150 }] } },
        { "at": 180, "signal": { "type": "navigation", "dom_content_loaded_event_end": 180 } },
        { "at": 270, "signal": { "type": "long_task", "start_time": 210, "duration": 60 } },
        { "at": 900, "signal": { "type": "paint", "name": "LCP", "entries": [{ "start_time": 212 }] } }
    ]
}"#;

#[test]
fn test_replay_page_load() {
    let trace = SignalTrace::from_json(PAGE_LOAD).expect("trace parses");
    let outcome = replay(&trace).expect("replay runs");

    assert_eq!(outcome.step, DetectorStep::Reported(TtiMetric { value: 312 }));
    assert_eq!(outcome.reported, Some(TtiMetric { value: 312 }));
    assert_eq!(outcome.visually_ready, Some(212.0));
    assert_eq!(outcome.ended_at_ms, 2000.0);
}

#[test]
fn test_replay_empty_trace() {
    let trace = SignalTrace::from_json("{}").expect("empty trace parses");
    let outcome = replay(&trace).expect("replay runs");

    assert_eq!(
        outcome.step,
        DetectorStep::Failed(TtiError::NoVisuallyReadySignal { waited_ms: 10_000 })
    );
    assert_eq!(outcome.reported, None);
    assert_eq!(outcome.visually_ready, None);
}

#[test]
fn test_replay_rejects_unsupported_environment() {
    let trace = SignalTrace::from_json(r#"{ "environment": { "long_tasks": false } }"#)
        .expect("trace parses");
    assert!(replay(&trace).is_err());
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = TtiConfig::from_json(r#"{ "fps_enabled": true, "tti_timeout_ms": 5000 }"#)
        .expect("config parses");

    assert!(config.fps_enabled);
    assert_eq!(config.tti_timeout_ms, 5000);
    assert_eq!(config.collection_period_ms, 100);
    assert_eq!(config.frames_per_bucket(), 2);
}

#[test]
fn test_consumer_event_shape() {
    let event = TimeToInteractiveEvent::from(TtiMetric::from_ms(311.6));
    let json = serde_json::to_value(&event).expect("event serializes");

    assert_eq!(json["type"], "time_to_interactive_event");
    assert_eq!(json["version"], "1.0.0");
    assert_eq!(json["value"], 312);
}
