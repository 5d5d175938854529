//! Error types for the date encoder.

use thiserror::Error;

/// Date encoder error types.
#[derive(Error, Debug)]
pub enum EncoderError {
    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Invalid construction arguments
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Input that is neither a timestamp nor missing
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Buffer, bit slice or bucket list of the wrong length
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Bucket index that the sub-encoder cannot resolve
    #[error("Bucket {bucket:?} out of range for field '{field}' ({buckets} buckets)")]
    BucketOutOfRange {
        field: String,
        bucket: Option<usize>,
        buckets: usize,
    },
}

impl EncoderError {
    /// True for errors raised while building an encoder.
    pub fn is_config(&self) -> bool {
        matches!(self, EncoderError::Config(_) | EncoderError::JsonParse(_))
    }
}

/// Result type alias for encoder operations.
pub type Result<T> = std::result::Result<T, EncoderError>;
