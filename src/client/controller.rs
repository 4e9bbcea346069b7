//! # Client Synchronization Controller
//!
//! Keeps a client's local state in step with the board server across
//! disconnects.
//!
//! ## Lifecycle
//!
//! `start` spawns one background task that owns the connection:
//!
//! 1. Connect through the `Connector`. On failure wait `reconnect_delay`
//!    and try again, forever.
//! 2. Mark the session connected. If a display name is known, send
//!    `user:join` then `board:init`; the `board:data` reply replaces the
//!    local store, so edits missed while offline are reconciled.
//! 3. Forward queued intents and apply incoming events until the connection
//!    closes, then mark the session disconnected and go back to 1.
//!
//! `start` is idempotent. `stop` aborts the task, which drops the
//! connection, and resets the controller to not-started.
//!
//! ## Intents
//!
//! Intents go through a bounded queue. While disconnected they wait in the
//! queue and are sent after the handshake of the next connection. An intent
//! whose send fails because the connection just dropped is retried on the
//! next connection.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use corkboard::client::{SyncController, WsConnector};
//! use corkboard::shared::{AppConfig, NoteDraft};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let connector = WsConnector::new(config.socket_url.clone());
//! let mut controller = SyncController::new(config, connector);
//!
//! controller.join("Ana").await?;
//! controller.create_note(NoteDraft::default()).await?;
//!
//! let notes = controller.notes().await;
//! # Ok(())
//! # }
//! ```

use crate::client::error::ClientError;
use crate::client::state::ClientState;
use crate::client::transport::{Connection, Connector};
use crate::shared::{now_millis, AppConfig, ClientEvent, Note, NoteDraft, NotePatch};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct Running {
    outbound: mpsc::Sender<ClientEvent>,
    task: JoinHandle<()>,
}

/// Client synchronization controller
pub struct SyncController<C: Connector> {
    config: AppConfig,
    connector: Arc<C>,
    state: Arc<RwLock<ClientState>>,
    running: Option<Running>,
}

impl<C: Connector> SyncController<C> {
    pub fn new(config: AppConfig, connector: C) -> Self {
        Self {
            config,
            connector: Arc::new(connector),
            state: Arc::new(RwLock::new(ClientState::new())),
            running: None,
        }
    }

    /// Shared handle to the local state
    pub fn state(&self) -> Arc<RwLock<ClientState>> {
        self.state.clone()
    }

    pub fn is_started(&self) -> bool {
        self.running.is_some()
    }

    /// Start the background connection task; no-op if already started
    pub fn start(&mut self) {
        if self.running.is_some() {
            return;
        }
        let (outbound, outbound_rx) = mpsc::channel(self.config.outbound_capacity);
        let task = tokio::spawn(run(
            self.connector.clone(),
            self.state.clone(),
            outbound_rx,
            self.config.reconnect_delay,
        ));
        info!("[Sync] Controller started");
        self.running = Some(Running { outbound, task });
    }

    /// Stop the background task and drop the connection
    pub async fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.task.abort();
            let _ = running.task.await;
            info!("[Sync] Controller stopped");
        }
        self.state.write().await.session.set_connected(false);
    }

    /// Set the display name and join the board
    ///
    /// Starts the controller if needed. If already connected, `user:join`
    /// and `board:init` are sent right away; otherwise they are sent as part
    /// of the next connection's handshake.
    ///
    /// # Errors
    ///
    /// `Shared(ValidationError)` if the trimmed name is empty.
    pub async fn join(&mut self, name: &str) -> Result<(), ClientError> {
        let (name, connected) = {
            let mut state = self.state.write().await;
            let name = state.session.set_user_name(name)?.to_string();
            (name, state.session.is_connected())
        };

        if !self.is_started() {
            self.start();
            return Ok(());
        }
        if connected {
            self.send(ClientEvent::UserJoin { name }).await?;
            self.send(ClientEvent::BoardInit).await?;
        }
        Ok(())
    }

    pub async fn create_note(&self, draft: NoteDraft) -> Result<(), ClientError> {
        self.send(ClientEvent::NoteCreate(draft)).await
    }

    pub async fn update_note(&self, patch: NotePatch) -> Result<(), ClientError> {
        self.send(ClientEvent::NoteUpdate(patch)).await
    }

    /// Optimistic edit: stamp, apply locally, then send the full note
    pub async fn edit_note(&self, mut note: Note) -> Result<(), ClientError> {
        note.timestamp = now_millis();
        let patch = NotePatch::from_note(&note);
        self.state.write().await.notes.upsert_local(note);
        self.send(ClientEvent::NoteUpdate(patch)).await
    }

    pub async fn delete_note(&self, id: impl Into<String>) -> Result<(), ClientError> {
        self.send(ClientEvent::NoteDelete { id: id.into() }).await
    }

    pub async fn add_comment(
        &self,
        note_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.send(ClientEvent::NoteComment {
            note_id: note_id.into(),
            text: text.into(),
        })
        .await
    }

    /// Notes in display order
    pub async fn notes(&self) -> Vec<Note> {
        self.state.read().await.notes.list()
    }

    pub async fn online_users(&self) -> Vec<String> {
        self.state.read().await.presence.online_users().to_vec()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.session.is_connected()
    }

    async fn send(&self, event: ClientEvent) -> Result<(), ClientError> {
        let running = self.running.as_ref().ok_or(ClientError::NotStarted)?;
        running
            .outbound
            .send(event)
            .await
            .map_err(|_| ClientError::Closed)
    }
}

impl<C: Connector> Drop for SyncController<C> {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.task.abort();
        }
    }
}

enum SessionEnd {
    /// The connection dropped; carries an intent that could not be sent
    Disconnected(Option<ClientEvent>),
    /// The controller was dropped
    Stopped,
}

async fn run<C: Connector>(
    connector: Arc<C>,
    state: Arc<RwLock<ClientState>>,
    mut outbound: mpsc::Receiver<ClientEvent>,
    reconnect_delay: std::time::Duration,
) {
    let mut carried: Option<ClientEvent> = None;

    loop {
        match connector.connect().await {
            Ok(connection) => {
                info!("[Sync] Connected");
                let end = drive(&state, connection, &mut outbound, carried.take()).await;
                state.write().await.session.set_connected(false);
                match end {
                    SessionEnd::Stopped => break,
                    SessionEnd::Disconnected(unsent) => {
                        info!("[Sync] Disconnected, reconnecting in {:?}", reconnect_delay);
                        carried = unsent;
                    }
                }
            }
            Err(e) => {
                warn!("[Sync] Connect failed: {}", e);
            }
        }
        tokio::time::sleep(reconnect_delay).await;
    }
}

/// Run one connection until it drops
async fn drive(
    state: &Arc<RwLock<ClientState>>,
    mut connection: Connection,
    outbound: &mut mpsc::Receiver<ClientEvent>,
    carried: Option<ClientEvent>,
) -> SessionEnd {
    let user_name = {
        let mut state = state.write().await;
        state.session.set_connected(true);
        state.session.user_name().map(str::to_owned)
    };

    let mut handshake = Vec::new();
    if let Some(name) = user_name {
        handshake.push(ClientEvent::UserJoin { name });
        handshake.push(ClientEvent::BoardInit);
    }
    handshake.extend(carried);

    for event in handshake {
        if let Err(unsent) = connection.outgoing.send(event).await {
            return SessionEnd::Disconnected(carry(unsent.0));
        }
    }

    // At most one intent waits for room on the connection; events keep
    // being applied meanwhile.
    let mut pending: Option<ClientEvent> = None;

    loop {
        tokio::select! {
            incoming = connection.incoming.recv() => match incoming {
                Some(event) => {
                    debug!("[Sync] Received {}", event.name());
                    state.write().await.apply(event);
                }
                None => return SessionEnd::Disconnected(pending.and_then(carry)),
            },

            permit = connection.outgoing.reserve(), if pending.is_some() => match permit {
                Ok(permit) => {
                    if let Some(event) = pending.take() {
                        permit.send(event);
                    }
                }
                Err(_) => return SessionEnd::Disconnected(pending.and_then(carry)),
            },

            intent = outbound.recv(), if pending.is_none() => match intent {
                Some(event) => pending = Some(event),
                None => return SessionEnd::Stopped,
            },
        }
    }
}

/// Handshake events are regenerated on every connection, so only user
/// intents are carried over.
fn carry(event: ClientEvent) -> Option<ClientEvent> {
    match event {
        ClientEvent::UserJoin { .. } | ClientEvent::BoardInit => None,
        other => Some(other),
    }
}
