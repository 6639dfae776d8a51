// src/error.rs

//! Unified error handling for the docward client.

use std::fmt;

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Session ended: the server answered 401 and the stored token was cleared
    #[error("session ended: sign in again")]
    Unauthorized,

    /// Structured rejection from the API (`{"detail": ...}` payload)
    #[error("request rejected (HTTP {status}): {message}")]
    RemoteRejected { status: u16, message: String },

    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local pre-submit validation failed (never reaches the network)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Composite content+images creation failed partway.
    ///
    /// `rolled_back` distinguishes the recovered case (content row deleted
    /// again) from the dangling case (content exists but images are missing).
    #[error("{message}")]
    PartialFailure {
        content_id: String,
        rolled_back: bool,
        message: String,
    },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a remote rejection with context.
    pub fn remote(status: u16, message: impl fmt::Display) -> Self {
        Self::RemoteRejected {
            status,
            message: message.to_string(),
        }
    }

    /// Partial failure whose rollback delete succeeded.
    pub fn partial_rolled_back(content_id: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self::PartialFailure {
            content_id: content_id.into(),
            rolled_back: true,
            message: format!("image step failed, content creation rolled back: {cause}"),
        }
    }

    /// Partial failure whose rollback delete also failed.
    pub fn partial_dangling(content_id: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self::PartialFailure {
            content_id: content_id.into(),
            rolled_back: false,
            message: format!("content exists but some images may be missing: {cause}"),
        }
    }

    /// Whether this is a duplicate-resource conflict (HTTP 409).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::RemoteRejected { status: 409, .. })
    }

    /// Whether the session was invalidated by the server.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_detection() {
        assert!(AppError::remote(409, "duplicate").is_conflict());
        assert!(!AppError::remote(422, "invalid").is_conflict());
        assert!(!AppError::Unauthorized.is_conflict());
    }

    #[test]
    fn test_partial_failure_messages_differ() {
        let rolled = AppError::partial_rolled_back("c1", "upload failed");
        let dangling = AppError::partial_dangling("c1", "upload failed");
        assert!(rolled.to_string().contains("rolled back"));
        assert!(dangling.to_string().contains("images may be missing"));
    }
}
