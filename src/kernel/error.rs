use thiserror::Error;

/// Local failures of one TTI computation. None of these reach the report
/// callback; a missing report is the only outward signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TtiError {
    #[error("no visually-ready signal arrived within {waited_ms}ms")]
    NoVisuallyReadySignal { waited_ms: u64 },

    #[error("TTI computation timed out after {waited_ms}ms")]
    SearchTimedOut { waited_ms: u64 },

    #[error("long-task signal unsupported in this environment")]
    EnvironmentUnsupported,

    #[error("TTI computation torn down before it settled")]
    Cancelled,
}

impl TtiError {
    /// Stable short name for telemetry records.
    pub fn reason(&self) -> &'static str {
        match self {
            TtiError::NoVisuallyReadySignal { .. } => "no_visually_ready_signal",
            TtiError::SearchTimedOut { .. } => "search_timed_out",
            TtiError::EnvironmentUnsupported => "environment_unsupported",
            TtiError::Cancelled => "cancelled",
        }
    }
}
