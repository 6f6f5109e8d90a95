//! Error types for the case engine
//!
//! Tree operations never fail: a missing target returns the input document.
//! Errors only come from the boundary: parsing documents, loading
//! configuration and interpreting UI element-type strings.

use case_model::{ModelError, NodeKey};

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Document boundary failure
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Request body could not be encoded
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// UI element-type string not recognised
    #[error("unknown element type: {0}")]
    UnknownElementType(String),

    /// Orphan cannot hang under the chosen parent
    #[error("cannot attach {element} to {parent}")]
    InvalidAttachment { element: String, parent: NodeKey },

    /// Element type disagrees with the node it was given with
    #[error("element type {element} does not describe {node}")]
    TypeMismatch { element: String, node: NodeKey },

    /// Node has no parent reference to detach from
    #[error("{0} has no parent to detach from")]
    NoParent(NodeKey),
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
