//! Error types for stage operations.

use thiserror::Error;

use crate::path::PathError;

/// Result type for stage operations.
pub type StageResult<T> = Result<T, StageError>;

/// Errors that can occur in stage operations.
#[derive(Debug, Error)]
pub enum StageError {
    /// Node not found in a scene.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Invalid node operation.
    #[error("Invalid operation on node: {0}")]
    InvalidOperation(String),

    /// Path data could not be parsed or replayed.
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// Preset table serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A literal (vector, color, ...) could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),
}
