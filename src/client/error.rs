//! Client Error Types

use crate::shared::{ConfigError, SharedError};
use thiserror::Error;

/// Errors raised by the synchronization client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not open a connection to the board server
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The open connection failed while in use
    #[error("Transport error: {0}")]
    Transport(String),

    /// An intent was issued before `start`/`join`, or after `stop`
    #[error("Sync controller is not running")]
    NotStarted,

    /// The controller's background task has exited
    #[error("Connection closed")]
    Closed,

    /// Validation or serialization error
    #[error(transparent)]
    Shared(#[from] SharedError),

    /// Invalid client configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Connect(err.to_string())
    }
}
