use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Cycle(#[from] CycleError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("report error: {0}")]
    Report(String),
    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("watch channel send failed")]
    WatchSend,
    #[error("state lock poisoned")]
    StateLock,
}

/// Failures that keep a cycle from starting. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    #[error("invalid reading for {road}: {reason}")]
    InvalidReading { road: String, reason: String },
    #[error("no downstream capacity configured for {road}")]
    MissingCapacityConfig { road: String },
    #[error("no metrics computed for {road}")]
    MissingMetrics { road: String },
    #[error("reading references unknown road {road}")]
    UnknownRoad { road: String },
    #[error("cycle plan does not serve {road}")]
    IncompletePlan { road: String },
}
