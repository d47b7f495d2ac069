//! Error types for the prediction client

use thiserror::Error;

/// Failure of the main fraud-scoring call
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PredictionError {
    #[error("LLM prediction call failed: {0}")]
    CallFailed(String),

    #[error("Prediction output failed validation: {0}")]
    InvalidOutput(String),
}

/// Failure of the supplementary explanation call
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExplanationError {
    #[error("LLM explanation call failed: {0}")]
    CallFailed(String),

    #[error("Explanation output failed validation: {0}")]
    InvalidOutput(String),
}
