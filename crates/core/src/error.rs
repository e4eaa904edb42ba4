// ABOUTME: Error types for batch loading, configuration, and export.
// ABOUTME: Field-level extraction never errors; only boundary operations return PipelineError.

use std::fmt;
use thiserror::Error;

/// Errors that can occur at the edges of the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input batch is not a list of program records.
    #[error("invalid batch: {0}")]
    InvalidBatch(String),

    /// The user profile document has the wrong shape.
    #[error("invalid user profile: {0}")]
    InvalidProfile(String),

    /// The input document could not be decoded as JSON.
    #[error("failed to decode json: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the tabular projection failed.
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The pipeline configuration could not be read.
    #[error("invalid config: {0}")]
    Config(String),
}

impl PipelineError {
    /// Creates an InvalidBatch error with a custom message.
    pub fn invalid_batch(msg: impl Into<String>) -> Self {
        PipelineError::InvalidBatch(msg.into())
    }

    pub fn invalid_profile(msg: impl Into<String>) -> Self {
        PipelineError::InvalidProfile(msg.into())
    }

    /// Creates a Config error from an underlying parser error.
    pub fn config(err: impl fmt::Display) -> Self {
        PipelineError::Config(err.to_string())
    }

    /// Returns true if the batch itself was malformed.
    pub fn is_invalid_batch(&self) -> bool {
        matches!(self, PipelineError::InvalidBatch(_))
    }
}
