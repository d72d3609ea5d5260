pub mod kernel;
pub mod replay;

pub use kernel::collectors::{signal_channel, EnvironmentSupport, SignalSender};
pub use kernel::config::TtiConfig;
pub use kernel::detector::{compute_time_to_interactive, DetectorStep, TtiDetector};
pub use kernel::error::TtiError;
pub use kernel::event::TtiMetric;
