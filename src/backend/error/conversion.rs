/**
 * Error Conversion
 *
 * This module turns backend errors raised while handling a client intent
 * into the `server:error` event sent back to that client only.
 *
 * # Message Format
 *
 * Clients receive a short, per-action message such as
 * "Could not create the note." The underlying error is logged on the
 * server and never sent over the wire.
 */
use crate::backend::error::types::BackendError;
use crate::shared::ServerEvent;

/// Client-facing message for a failed intent
pub fn failure_message(event: &str) -> &'static str {
    match event {
        "user:join" => "Could not join the board.",
        "board:init" => "Could not load the board.",
        "note:create" => "Could not create the note.",
        "note:update" => "Could not update the note.",
        "note:delete" => "Could not delete the note.",
        "note:comment" => "Could not add the comment.",
        _ => "Could not process the message.",
    }
}

impl BackendError {
    /// Convert into the `server:error` event for the intent named `event`
    pub fn to_server_event(&self, event: &str) -> ServerEvent {
        ServerEvent::error(failure_message(event))
    }
}
