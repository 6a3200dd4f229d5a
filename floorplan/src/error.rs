//! Error types for scene input boundaries.

use thiserror::Error;

/// Errors reported by scene loading, settings and "add" actions.
///
/// Graph edits never fail: missing ids and degenerate geometry produce
/// `None`/`false` instead.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Scene or settings JSON could not be parsed.
    #[error("malformed scene json: {0}")]
    Parse(#[from] serde_json::Error),

    /// User supplied a value outside the accepted domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Scene file exceeds an ingestion cap.
    #[error("{what} exceeds limit of {limit}")]
    LimitExceeded { what: &'static str, limit: usize },

    /// A coordinate or size is NaN, infinite or outside the world bounds.
    #[error("parameter '{0}' must be finite and within bounds")]
    NonFinite(&'static str),
}

impl SceneError {
    /// Stable machine-readable code, mirrored by the wasm bindings.
    pub fn code(&self) -> &'static str {
        match self {
            SceneError::Parse(_) => "parse_error",
            SceneError::InvalidInput(_) => "invalid_input",
            SceneError::LimitExceeded { .. } => "limit_exceeded",
            SceneError::NonFinite(_) => "non_finite",
        }
    }
}

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
