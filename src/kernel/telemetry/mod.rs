//! Lifecycle records of TTI computations.
//!
//! Telemetry is a read-only side-effect layer: the detector writes to it but
//! never reads it back when deciding anything.

pub mod event;
pub mod metrics;
pub mod recorder;
