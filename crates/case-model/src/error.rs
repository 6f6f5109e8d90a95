//! Error types for the case model

/// Errors raised at the document boundary
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Type tag that matches none of the known spellings
    #[error("unknown node kind: {0}")]
    UnknownKind(String),

    /// Path string that does not parse
    #[error("invalid node path: {0}")]
    InvalidPath(String),

    /// JSON (de)serialization failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;
