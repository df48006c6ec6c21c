use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A malformed event. Fatal to the single event it describes, never to the log.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid clock value: {0}")]
    InvalidClock(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid penalty duration: {0}")]
    InvalidDuration(String),

    #[error("Unknown event kind: {0}")]
    UnknownKind(String),
}

impl ValidationError {
    pub fn missing(field: &str) -> Self {
        ValidationError::MissingField(field.to_string())
    }
}
