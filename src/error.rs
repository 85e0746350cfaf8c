//! Pipeline error types
//!
//! Every stage surfaces failures as a structured kind + message. The only
//! errors that are not propagated are per-row skips during ingest, which are
//! counted and logged instead.

use thiserror::Error;

/// Errors that can occur in any pipeline stage
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required value could not be parsed, or structure was invalid
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An operation was invoked before its required predecessor output exists
    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(String),

    /// Zero usable samples survived a stage; downstream work would be meaningless
    #[error("insufficient data: {0}")]
    DataInsufficiency(String),

    /// The model failed during fit or predict
    #[error("training failed: {0}")]
    TrainingFailure(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
