use thiserror::Error;

use crate::types::{Period, RunId};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Run {run_id} is over: decision for period {period} rejected")]
    InvalidState { run_id: RunId, period: Period },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Unknown {field} option '{value}'")]
    UnknownOption { field: &'static str, value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
