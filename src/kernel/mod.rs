pub mod cancel;
pub mod collectors;
pub mod config;
pub mod detector;
pub mod error;
pub mod event;
pub mod quiet_window;
pub mod scheduler;
pub mod telemetry;
pub mod time;
pub mod tracker;
pub mod visually_ready;
