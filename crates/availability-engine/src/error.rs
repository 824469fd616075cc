//! Error types for availability-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid slot duration: {0}s (must be positive)")]
    InvalidSlotDuration(i64),

    #[error("Invalid slot count: {0} (must be at least 1)")]
    InvalidSlotCount(usize),
}

pub type Result<T> = std::result::Result<T, EngineError>;
