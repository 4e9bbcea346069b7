/**
 * Realtime Event Protocol
 *
 * This module defines the events exchanged over the board's WebSocket.
 * Every frame is a JSON text message of the form
 * `{"event": "<name>", "data": <payload>}`.
 *
 * # Client → Server
 *
 * `user:join`, `board:init`, `note:create`, `note:update`, `note:delete`,
 * `note:comment`
 *
 * # Server → Client
 *
 * `presence:users`, `board:data`, `note:created`, `note:updated`,
 * `note:deleted`, `note:commented`, `server:error`
 */
use crate::shared::error::SharedError;
use crate::shared::note::{Comment, Note, NoteDraft, NotePatch};
use serde::{Deserialize, Serialize};

/// An online user as reported by `presence:users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUser {
    pub name: String,
}

/// Intent sent by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "user:join")]
    UserJoin { name: String },
    #[serde(rename = "board:init")]
    BoardInit,
    #[serde(rename = "note:create")]
    NoteCreate(NoteDraft),
    #[serde(rename = "note:update")]
    NoteUpdate(NotePatch),
    #[serde(rename = "note:delete")]
    NoteDelete { id: String },
    #[serde(rename = "note:comment")]
    NoteComment {
        #[serde(rename = "noteId")]
        note_id: String,
        text: String,
    },
}

impl ClientEvent {
    /// Every event name a client may send
    pub const NAMES: [&'static str; 6] = [
        "user:join",
        "board:init",
        "note:create",
        "note:update",
        "note:delete",
        "note:comment",
    ];

    /// Wire name of this event
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserJoin { .. } => "user:join",
            Self::BoardInit => "board:init",
            Self::NoteCreate(_) => "note:create",
            Self::NoteUpdate(_) => "note:update",
            Self::NoteDelete { .. } => "note:delete",
            Self::NoteComment { .. } => "note:comment",
        }
    }

    /// Decode a text frame
    ///
    /// Returns `Ok(None)` for event names this protocol does not know, so the
    /// caller can ignore them. A known name with a malformed payload is an
    /// error carrying the event name.
    pub fn decode(text: &str) -> Result<Option<Self>, SharedError> {
        let frame: serde_json::Value = serde_json::from_str(text)?;
        let name = frame
            .get("event")
            .and_then(|v| v.as_str())
            .ok_or_else(|| SharedError::validation("event", "frame has no event name"))?;

        if !Self::NAMES.contains(&name) {
            return Ok(None);
        }

        // Payload-less intents may arrive with no `data`, `null`, or `{}`.
        let payload = frame.get("data").filter(|data| !data.is_null());
        match name {
            "board:init" => return Ok(Some(Self::BoardInit)),
            "note:create" if payload.is_none() => {
                return Ok(Some(Self::NoteCreate(NoteDraft::default())))
            }
            _ => {}
        }

        serde_json::from_value(frame.clone())
            .map(Some)
            .map_err(|e| SharedError::payload(name, e.to_string()))
    }

    /// Encode as a text frame
    pub fn encode(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Event sent by the server, either broadcast or to a single connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "presence:users")]
    PresenceUsers { users: Vec<PresenceUser> },
    #[serde(rename = "board:data")]
    BoardData { notes: Vec<Note> },
    #[serde(rename = "note:created")]
    NoteCreated(Note),
    #[serde(rename = "note:updated")]
    NoteUpdated(Note),
    #[serde(rename = "note:deleted")]
    NoteDeleted { id: String },
    #[serde(rename = "note:commented")]
    NoteCommented {
        #[serde(rename = "noteId")]
        note_id: String,
        comment: Comment,
    },
    #[serde(rename = "server:error")]
    ServerError { message: String },
}

impl ServerEvent {
    /// Wire name of this event
    pub fn name(&self) -> &'static str {
        match self {
            Self::PresenceUsers { .. } => "presence:users",
            Self::BoardData { .. } => "board:data",
            Self::NoteCreated(_) => "note:created",
            Self::NoteUpdated(_) => "note:updated",
            Self::NoteDeleted { .. } => "note:deleted",
            Self::NoteCommented { .. } => "note:commented",
            Self::ServerError { .. } => "server:error",
        }
    }

    /// Create a `server:error` event
    pub fn error(message: impl Into<String>) -> Self {
        Self::ServerError {
            message: message.into(),
        }
    }

    /// Decode a text frame
    pub fn decode(text: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode as a text frame
    pub fn encode(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}
