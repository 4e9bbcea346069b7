//! Client-side session, presence and board state.
//!
//! `ClientState` bundles the note store with the small amount of UI-facing
//! state a board client shows: who the local user is, whether the socket is
//! up, the last server error, and who else is online. `apply` folds one
//! server event into it.

use crate::client::store::NoteStore;
use crate::shared::{SharedError, ServerEvent};

/// Local user and connection status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    user_name: Option<String>,
    connected: bool,
    last_error: Option<String>,
}

impl SessionState {
    /// Set the display name after trimming it
    ///
    /// # Errors
    ///
    /// `ValidationError` if the name is empty after trimming.
    pub fn set_user_name(&mut self, name: &str) -> Result<&str, SharedError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SharedError::validation("name", "Display name cannot be empty"));
        }
        Ok(self.user_name.insert(name.to_string()).as_str())
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_last_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}

/// Names of online users, in the order the server reports them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresenceState {
    online_users: Vec<String>,
}

impl PresenceState {
    pub fn set_online_users(&mut self, users: Vec<String>) {
        self.online_users = users;
    }

    pub fn online_users(&self) -> &[String] {
        &self.online_users
    }
}

/// Everything a board client keeps locally
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    pub notes: NoteStore,
    pub session: SessionState,
    pub presence: PresenceState,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one server event into local state
    pub fn apply(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::PresenceUsers { users } => {
                self.presence
                    .set_online_users(users.into_iter().map(|u| u.name).collect());
            }
            ServerEvent::BoardData { notes } => {
                tracing::debug!("[Sync] Board snapshot with {} notes", notes.len());
                self.notes.set_all(notes);
            }
            ServerEvent::NoteCreated(note) | ServerEvent::NoteUpdated(note) => {
                self.notes.upsert_remote(note);
            }
            ServerEvent::NoteDeleted { id } => {
                self.notes.remove(&id);
            }
            ServerEvent::NoteCommented { note_id, comment } => {
                self.notes.add_comment_remote(&note_id, comment);
            }
            ServerEvent::ServerError { message } => {
                tracing::warn!("[Sync] Server error: {}", message);
                self.session.set_last_error(message);
            }
        }
    }
}
