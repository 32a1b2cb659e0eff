//! Crate-level error type for model construction, configuration and runs.
use crate::compute::ComputationError;
use thiserror::Error;

/// Errors surfaced by the model construction, configuration and run APIs.
///
/// A `Computation` error raised during a step aborts only that step; nothing
/// from the failed step is committed to any history.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Element '{0}' already exists")]
    DuplicateElement(String),
    #[error("Unknown element '{0}'")]
    UnknownElement(String),
    #[error("Element '{0}' has no recorded value")]
    EmptyHistory(String),
    #[error("Stock '{0}' cannot carry a computation")]
    StockWithComputation(String),
    #[error(transparent)]
    Computation(#[from] ComputationError),
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[error("Failed to parse session config: {source}")]
    ConfigParse {
        #[from]
        source: serde_json::Error,
    },
}

pub type SimResult<T> = Result<T, ModelError>;
