//! Error types for the answer tracker.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every oatrack crate.
///
/// The first three variants are the user-facing failure taxonomy: a backend
/// that never became ready, a draft rejected before it reached the store, and
/// a store call the backend refused. None of them are retried automatically.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum OatrackError {
    /// The store adapter did not signal readiness in time.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A required field was missing or malformed.
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// The store adapter rejected a call.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Operation issued in a lifecycle phase that does not allow it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OatrackError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a BackendUnavailable error
    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::BackendUnavailable(message.into())
    }

    /// Creates a Validation error for the given field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }

    /// Message suitable for showing to the person using the tracker.
    ///
    /// Validation failures read as a form prompt; everything else keeps the
    /// full error text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { .. } => "Please fill in all fields".to_string(),
            Self::BackendUnavailable(_) => {
                "Error connecting to database. Please refresh the page.".to_string()
            }
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for OatrackError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for OatrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for OatrackError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for OatrackError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at the CLI boundary)
impl From<anyhow::Error> for OatrackError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, OatrackError>`.
pub type Result<T> = std::result::Result<T, OatrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_user_message() {
        let err = OatrackError::validation("company", "company is required");
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Please fill in all fields");
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: OatrackError = io.into();
        assert!(err.to_string().contains("NotFound"));
    }

    #[test]
    fn test_persistence_display() {
        let err = OatrackError::persistence("unknown id 'x'");
        assert!(err.is_persistence());
        assert_eq!(err.to_string(), "Persistence error: unknown id 'x'");
    }
}
