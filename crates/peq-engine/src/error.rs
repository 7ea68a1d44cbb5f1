//! Audio engine error types

use peq_core::EqError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("No free filter slot (capacity {0})")]
    NoFreeSlot(usize),

    #[error("Unknown filter handle: {0}")]
    UnknownHandle(usize),

    #[error("Invalid connection: {0}")]
    InvalidConnection(String),

    #[error("Playback refused: {0}")]
    PlaybackRefused(String),

    #[error("Engine closed")]
    Closed,
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<EngineError> for EqError {
    fn from(e: EngineError) -> Self {
        EqError::Engine(e.to_string())
    }
}
