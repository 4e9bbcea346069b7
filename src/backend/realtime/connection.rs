//! Per-connection state for WebSocket connections.

use crate::backend::board::ConnectionId;
use std::time::Instant;

/// Lifecycle of a single connection.
///
/// Intents are accepted in every phase except `Disconnected`; the phase is
/// tracked for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// Socket open, no `user:join` yet
    Connected,
    /// `user:join` received
    Joined,
    /// `board:init` answered at least once
    Synced,
    /// Socket closed
    Disconnected,
}

/// Per-connection state.
#[derive(Debug)]
pub struct BoardConnection {
    /// Unique connection ID (server-generated UUID)
    pub id: ConnectionId,

    /// Display name from the latest `user:join`
    pub name: Option<String>,

    pub phase: ConnectionPhase,

    /// Last activity timestamp (for timeout detection)
    pub last_activity: Instant,
}

impl BoardConnection {
    /// Create a new connection.
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: None,
            phase: ConnectionPhase::Connected,
            last_activity: Instant::now(),
        }
    }

    /// Update last activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn joined(&mut self, name: &str) {
        self.name = Some(name.to_string());
        if self.phase == ConnectionPhase::Connected {
            self.phase = ConnectionPhase::Joined;
        }
    }

    pub fn synced(&mut self) {
        if self.phase != ConnectionPhase::Disconnected {
            self.phase = ConnectionPhase::Synced;
        }
    }

    pub fn disconnected(&mut self) {
        self.phase = ConnectionPhase::Disconnected;
    }
}

impl Default for BoardConnection {
    fn default() -> Self {
        Self::new()
    }
}
