//! Shared Error Types
//!
//! This module defines error types that are shared between the server and clients.
//! These errors represent common failure cases that can occur in both contexts.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Data validation failures
//! - `PayloadError` - A known event arrived with a payload that does not fit it
//!
//! # Usage
//!
//! ```rust
//! use corkboard::shared::error::SharedError;
//!
//! // Create a validation error
//! let error = SharedError::validation("name", "Display name cannot be empty");
//! ```
use thiserror::Error;

/// Shared error types that can occur on both sides of the connection
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Malformed payload for a known event
    #[error("Invalid payload for '{event}': {message}")]
    PayloadError {
        /// Wire name of the event
        event: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new payload error
    pub fn payload(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PayloadError {
            event: event.into(),
            message: message.into(),
        }
    }

    /// Event name for payload errors
    pub fn event(&self) -> Option<&str> {
        match self {
            Self::PayloadError { event, .. } => Some(event),
            _ => None,
        }
    }
}

/// Helper trait for converting serialization errors
impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
