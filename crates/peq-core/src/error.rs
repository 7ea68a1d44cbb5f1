//! Error types for the equalizer core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EqError {
    /// Operation needs a bound audio graph / sample rate that is absent
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Index outside the session's fixed topology
    #[error("Stage index {index} out of range (chain has {len} stages)")]
    OutOfRange { index: usize, len: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Host audio engine refused a graph operation
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl EqError {
    /// Recoverable conditions a caller may retry once the precondition holds
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EqError::NotReady(_) | EqError::OutOfRange { .. })
    }
}

impl From<serde_json::Error> for EqError {
    fn from(e: serde_json::Error) -> Self {
        EqError::Config(e.to_string())
    }
}

impl From<std::io::Error> for EqError {
    fn from(e: std::io::Error) -> Self {
        EqError::Config(e.to_string())
    }
}

/// Result type alias
pub type EqResult<T> = Result<T, EqError>;
