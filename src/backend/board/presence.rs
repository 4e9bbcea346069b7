//! Session/presence registry.
//!
//! Maps a live connection ID to the display name it joined with. Names are
//! not unique and nothing here is persisted. Users are reported in the
//! order their connection first joined.

use crate::shared::PresenceUser;
use std::collections::HashMap;

/// Unique connection ID (server-generated UUID)
pub type ConnectionId = String;

#[derive(Debug, Clone)]
struct Session {
    joined_seq: u64,
    name: String,
}

/// Registry of joined connections
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    sessions: HashMap<ConnectionId, Session>,
    next_seq: u64,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or rename) the session for a connection.
    ///
    /// A repeated join keeps the connection's original position.
    pub fn join(&mut self, conn_id: &str, name: impl Into<String>) {
        let name = name.into();
        if let Some(session) = self.sessions.get_mut(conn_id) {
            session.name = name;
            return;
        }
        let joined_seq = self.next_seq;
        self.next_seq += 1;
        self.sessions
            .insert(conn_id.to_string(), Session { joined_seq, name });
    }

    /// Remove a connection's session, returning its name if it had joined.
    pub fn leave(&mut self, conn_id: &str) -> Option<String> {
        self.sessions.remove(conn_id).map(|s| s.name)
    }

    pub fn name_of(&self, conn_id: &str) -> Option<&str> {
        self.sessions.get(conn_id).map(|s| s.name.as_str())
    }

    /// Online users in join order.
    pub fn users(&self) -> Vec<PresenceUser> {
        let mut sessions: Vec<&Session> = self.sessions.values().collect();
        sessions.sort_by_key(|s| s.joined_seq);
        sessions
            .into_iter()
            .map(|s| PresenceUser {
                name: s.name.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
