use crate::types::Day;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: Day, end: Day },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Unknown label mode '{mode}'")]
    UnknownLabelMode { mode: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DashResult<T> = Result<T, DashError>;
