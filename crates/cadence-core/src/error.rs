//! Error types for Cadence

use std::time::Duration;
use thiserror::Error;

/// The main error type for Cadence operations
#[derive(Debug, Error)]
pub enum CadenceError {
    #[error("Invalid fixed step: {0} (must be positive and finite)")]
    InvalidFixedStep(f64),

    #[error("Invalid tick rate: {0} (must be positive and finite)")]
    InvalidTickRate(f64),

    #[error("Invalid FPS smoothing factor: {0} (must be within [0, 1])")]
    InvalidSmoothing(f64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Game error: {0}")]
    GameError(String),

    #[error("Scheduler thread panicked")]
    SchedulerPanicked,

    #[error("Scheduler thread did not stop within {0:?}")]
    StopTimeout(Duration),
}

/// Result type alias for Cadence operations
pub type Result<T> = std::result::Result<T, CadenceError>;

impl From<toml::de::Error> for CadenceError {
    fn from(err: toml::de::Error) -> Self {
        CadenceError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for CadenceError {
    fn from(err: toml::ser::Error) -> Self {
        CadenceError::TomlSerError(err.to_string())
    }
}
