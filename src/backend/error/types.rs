/**
 * Backend Error Types
 *
 * This module defines error types specific to the board server.
 *
 * # Error Types
 *
 * - `NotFound` - An intent targeted a note that does not exist
 * - `InvalidPayload` - A frame could not be decoded (wraps `SharedError`)
 * - `PersistenceError` - Reading or writing the board snapshot failed
 * - `SerializationError` - JSON encoding failed
 * - `ConfigError` - Server configuration could not be loaded
 *
 * # Handling
 *
 * `NotFound` is not reported to clients: the intent is dropped and counted.
 * Every other error raised while handling an intent is turned into a
 * `server:error` for the sender (see `conversion`).
 */
use crate::shared::SharedError;
use thiserror::Error;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// The targeted note does not exist
    #[error("Note not found: {id}")]
    NotFound {
        /// ID the intent referred to
        id: String,
    },

    /// Shared error (from shared module)
    ///
    /// Raised when a frame is not valid JSON, has no event name, or carries a
    /// payload that does not fit its event.
    #[error(transparent)]
    InvalidPayload(#[from] SharedError),

    /// Snapshot I/O error
    #[error("Persistence error at {path}: {source}")]
    PersistenceError {
        /// File that was being read or written
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Human-readable error message
        message: String,
    },
}

impl BackendError {
    /// Create a new not-found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a new persistence error for `path`
    pub fn persistence(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::PersistenceError {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Whether this error means the intent should be silently dropped
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}
