/**
 * Realtime Gateway
 *
 * This module accepts board WebSocket connections at `GET /ws`, decodes the
 * client intents arriving on each one, applies them to the shared
 * `BoardState`, and forwards every broadcast event back to the socket.
 *
 * # Connection Loop
 *
 * Each connection runs one task that selects over:
 *
 * - events from the broadcast channel (written to the socket in order)
 * - the keep-alive ping interval
 * - frames from the client (handled one at a time, in arrival order)
 *
 * Replies meant only for this connection (`board:data`, `server:error`)
 * are written directly by the same task. A connection that falls behind the
 * broadcast channel is resent the full presence list and board instead of
 * the events it missed.
 *
 * # Failure Handling
 *
 * - Unknown event names are ignored.
 * - Malformed frames get a `server:error` sent to this connection only.
 * - Updates and comments that target a missing note are dropped silently
 *   (logged and counted).
 */
use crate::backend::board::BoardState;
use crate::backend::error::BackendError;
use crate::backend::realtime::connection::BoardConnection;
use crate::shared::{ClientEvent, ServerEvent};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use bytes::Bytes;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Keep-alive ping interval (30 seconds)
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Timeout for considering a connection dead (90 seconds = 3 missed pings)
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(90);

/// Handle WebSocket upgrade request.
pub async fn handle_socket_upgrade(
    ws: WebSocketUpgrade,
    State(board): State<BoardState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, board))
}

/// Handle an established WebSocket connection.
async fn handle_socket(mut socket: WebSocket, board: BoardState) {
    let mut conn = BoardConnection::new();
    let mut events = board.subscribe();
    info!("[Gateway] Client connected: {}", conn.id);

    let mut ping_interval = interval_at(Instant::now() + PING_INTERVAL, PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            broadcast = events.recv() => match broadcast {
                Ok(event) => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("[Gateway] {} lagged, skipped {} events; resyncing", conn.id, skipped);
                    let mut delivered = true;
                    for event in board.resync(&mut events).await {
                        if send_event(&mut socket, &event).await.is_err() {
                            delivered = false;
                            break;
                        }
                    }
                    if !delivered {
                        break;
                    }
                }
                Err(RecvError::Closed) => break,
            },

            _ = ping_interval.tick() => {
                if conn.last_activity.elapsed() > CONNECTION_TIMEOUT {
                    warn!("[Gateway] {} timed out after {:?}", conn.id, CONNECTION_TIMEOUT);
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                }
                if let Err(e) = socket.send(Message::Ping(Bytes::new())).await {
                    debug!("[Gateway] Failed to ping {}: {}", conn.id, e);
                    break;
                }
            }

            frame = socket.recv() => match frame {
                Some(Ok(Message::Text(text))) => {
                    conn.touch();
                    if let Some(reply) = handle_text(&board, &mut conn, text.as_str()).await {
                        if send_event(&mut socket, &reply).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) => {
                    debug!("[Gateway] {} initiated close", conn.id);
                    break;
                }
                Some(Ok(_)) => {
                    // Binary, ping and pong frames only count as activity
                    conn.touch();
                }
                Some(Err(e)) => {
                    debug!("[Gateway] Socket error on {}: {}", conn.id, e);
                    break;
                }
                None => break,
            },
        }
    }

    conn.disconnected();
    drop(events);
    board.leave(&conn.id).await;
    info!("[Gateway] Client disconnected: {}", conn.id);
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), ()> {
    let text = match event.encode() {
        Ok(text) => text,
        Err(e) => {
            error!("[Gateway] Failed to encode {}: {}", event.name(), e);
            return Ok(());
        }
    };
    socket.send(Message::Text(text.into())).await.map_err(|e| {
        debug!("[Gateway] Failed to send {}: {}", event.name(), e);
    })
}

/// Decode one text frame and apply it
///
/// Returns the reply for this connection, if any.
pub async fn handle_text(
    board: &BoardState,
    conn: &mut BoardConnection,
    text: &str,
) -> Option<ServerEvent> {
    match ClientEvent::decode(text) {
        Ok(Some(event)) => dispatch(board, conn, event).await,
        Ok(None) => {
            debug!("[Gateway] Ignoring unknown event from {}", conn.id);
            None
        }
        Err(e) => {
            let event = e.event().unwrap_or("unknown").to_string();
            warn!("[Gateway] Rejected frame from {}: {}", conn.id, e);
            Some(BackendError::from(e).to_server_event(&event))
        }
    }
}

/// Apply a decoded intent on behalf of a connection
pub async fn dispatch(
    board: &BoardState,
    conn: &mut BoardConnection,
    event: ClientEvent,
) -> Option<ServerEvent> {
    let name = event.name();
    debug!("[Gateway] {} from {} ({:?})", name, conn.id, conn.phase);

    let result: Result<Option<ServerEvent>, BackendError> = match event {
        ClientEvent::UserJoin { name } => {
            conn.joined(&name);
            board.join(&conn.id, name).await;
            Ok(None)
        }
        ClientEvent::BoardInit => {
            conn.synced();
            Ok(Some(board.board_data().await))
        }
        ClientEvent::NoteCreate(draft) => {
            board.create_note(&conn.id, draft).await;
            Ok(None)
        }
        ClientEvent::NoteUpdate(patch) => {
            board.update_note(&conn.id, patch).await.map(|_| None)
        }
        ClientEvent::NoteDelete { id } => {
            board.delete_note(id).await;
            Ok(None)
        }
        ClientEvent::NoteComment { note_id, text } => board
            .add_comment(&conn.id, note_id, text)
            .await
            .map(|_| None),
    };

    match result {
        Ok(reply) => reply,
        Err(BackendError::NotFound { id }) => {
            board.record_dropped(name, &id);
            None
        }
        Err(e) => {
            error!("[Gateway] {} from {} failed: {}", name, conn.id, e);
            Some(e.to_server_event(name))
        }
    }
}
