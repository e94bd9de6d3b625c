//! Error types for the fallible edges of the analyzer.
//!
//! Semantic problems are never errors: they travel as diagnostics or IR
//! issues. Only file-system access and JSON (de)serialization can fail.

use thiserror::Error;

/// Errors that can occur while fingerprinting files or moving IR/config
/// snapshots in and out of JSON.
#[derive(Debug, Error)]
pub enum CoreError {
    /// IO error while reading file metadata.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// A snapshot or config had the right syntax but the wrong content.
    #[error("Invalid {kind}: {message}")]
    Invalid { kind: &'static str, message: String },
}

impl CoreError {
    /// Create a JSON error.
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json(message.into())
    }

    /// Create an invalid-config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::Invalid {
            kind: "config",
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
