use thiserror::Error;

/// Result type alias for hematite-nn operations.
pub type Result<T> = std::result::Result<T, HematiteError>;

/// Every failure a caller can see. All variants are raised synchronously at
/// the call that detects them and are correctable by the caller; nothing is
/// retried internally.
#[derive(Error, Debug)]
pub enum HematiteError {
    /// A layer dimension was zero (or negative in a model file).
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// A model source ran out of values, or a token was not numeric.
    #[error("malformed model: {0}")]
    MalformedModel(String),

    /// A vector's length does not match the configured dimensions.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
    },

    /// Transport error from a file-based save/load.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport error from the JSON model format.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
