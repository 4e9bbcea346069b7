/**
 * Board State Management
 *
 * `BoardState` ties the note repository, the presence registry, the
 * snapshotter and the broadcast channel together. Every intent the gateway
 * accepts is applied here.
 *
 * # Single Writer
 *
 * All note mutations go through one `Mutex<NoteRepository>`. The lock is held
 * while the resulting event is broadcast, so every connection observes
 * broadcasts in exactly the order the mutations were applied, and intents
 * from one connection (which are handled sequentially) take effect in the
 * order they were sent.
 *
 * # Thread Safety
 *
 * All fields are cheap to clone (`Arc` or channel handles), so the state can
 * be handed to every connection task.
 */
use crate::backend::board::presence::PresenceRegistry;
use crate::backend::board::repository::{NoteRepository, UNKNOWN_AUTHOR};
use crate::backend::board::snapshot::Snapshotter;
use crate::backend::error::BackendError;
use crate::backend::realtime::broadcast::{broadcast_event, RealtimeEventBroadcast};
use crate::shared::{Comment, Note, NoteDraft, NotePatch, ServerEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

/// Shared board state
#[derive(Clone)]
pub struct BoardState {
    notes: Arc<Mutex<NoteRepository>>,
    presence: Arc<Mutex<PresenceRegistry>>,
    snapshotter: Snapshotter,
    broadcast_tx: RealtimeEventBroadcast,
    dropped_intents: Arc<AtomicU64>,
}

impl BoardState {
    /// Create board state around restored notes
    pub fn new(notes: Vec<Note>, snapshotter: Snapshotter, broadcast_capacity: usize) -> Self {
        let (broadcast_tx, _) = broadcast::channel(broadcast_capacity.max(1));
        Self {
            notes: Arc::new(Mutex::new(NoteRepository::from_notes(notes))),
            presence: Arc::new(Mutex::new(PresenceRegistry::new())),
            snapshotter,
            broadcast_tx,
            dropped_intents: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe to every event broadcast from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Record a display name for a connection and broadcast presence
    pub async fn join(&self, conn_id: &str, name: String) {
        let mut presence = self.presence.lock().await;
        info!("[Presence] {} joined as {:?}", conn_id, name);
        presence.join(conn_id, name);
        broadcast_event(
            &self.broadcast_tx,
            ServerEvent::PresenceUsers {
                users: presence.users(),
            },
        );
    }

    /// Forget a connection and broadcast presence to those remaining
    pub async fn leave(&self, conn_id: &str) {
        let mut presence = self.presence.lock().await;
        if let Some(name) = presence.leave(conn_id) {
            info!("[Presence] {} ({:?}) left", conn_id, name);
        }
        broadcast_event(
            &self.broadcast_tx,
            ServerEvent::PresenceUsers {
                users: presence.users(),
            },
        );
    }

    /// The `board:data` reply for a connection
    pub async fn board_data(&self) -> ServerEvent {
        ServerEvent::BoardData {
            notes: self.notes.lock().await.snapshot(),
        }
    }

    /// Bring a lagging subscriber back in step with the board
    ///
    /// Replaces `events` with a fresh subscription and returns the current
    /// presence list and board contents. Both locks are held across the
    /// resubscribe, so every later broadcast arrives on the new receiver and
    /// nothing broadcast earlier is missing from the returned state.
    pub async fn resync(&self, events: &mut broadcast::Receiver<ServerEvent>) -> [ServerEvent; 2] {
        let notes = self.notes.lock().await;
        let presence = self.presence.lock().await;
        *events = self.broadcast_tx.subscribe();
        [
            ServerEvent::PresenceUsers {
                users: presence.users(),
            },
            ServerEvent::BoardData {
                notes: notes.snapshot(),
            },
        ]
    }

    /// Create a note authored by the connection's session
    pub async fn create_note(&self, conn_id: &str, draft: NoteDraft) -> Note {
        let author = self
            .name_of(conn_id)
            .await
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        let mut notes = self.notes.lock().await;
        let note = notes.create(draft, &author);
        self.snapshotter.schedule(notes.snapshot());
        broadcast_event(&self.broadcast_tx, ServerEvent::NoteCreated(note.clone()));
        note
    }

    /// Merge a partial update
    ///
    /// # Errors
    ///
    /// `NotFound` if the note does not exist; nothing is broadcast or saved.
    pub async fn update_note(&self, conn_id: &str, patch: NotePatch) -> Result<Note, BackendError> {
        let actor = self.name_of(conn_id).await;

        let mut notes = self.notes.lock().await;
        let note = notes.update(&patch, actor.as_deref())?;
        self.snapshotter.schedule(notes.snapshot());
        broadcast_event(&self.broadcast_tx, ServerEvent::NoteUpdated(note.clone()));
        Ok(note)
    }

    /// Delete a note; `note:deleted` is broadcast even if it did not exist
    pub async fn delete_note(&self, id: String) {
        let mut notes = self.notes.lock().await;
        if notes.delete(&id) {
            self.snapshotter.schedule(notes.snapshot());
        }
        broadcast_event(&self.broadcast_tx, ServerEvent::NoteDeleted { id });
    }

    /// Append a comment authored by the connection's session
    ///
    /// # Errors
    ///
    /// `NotFound` if the note does not exist.
    pub async fn add_comment(
        &self,
        conn_id: &str,
        note_id: String,
        text: String,
    ) -> Result<Comment, BackendError> {
        let author = self
            .name_of(conn_id)
            .await
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        let mut notes = self.notes.lock().await;
        let comment = notes.add_comment(&note_id, &author, text)?;
        self.snapshotter.schedule(notes.snapshot());
        broadcast_event(
            &self.broadcast_tx,
            ServerEvent::NoteCommented {
                note_id,
                comment: comment.clone(),
            },
        );
        Ok(comment)
    }

    /// Count an intent dropped because its note did not exist
    pub fn record_dropped(&self, event: &str, id: &str) {
        let total = self.dropped_intents.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(
            "[Board] Dropped {} for missing note {} ({} dropped so far)",
            event, id, total
        );
    }

    pub fn dropped_intents(&self) -> u64 {
        self.dropped_intents.load(Ordering::Relaxed)
    }

    pub async fn note_count(&self) -> usize {
        self.notes.lock().await.len()
    }

    pub async fn user_count(&self) -> usize {
        self.presence.lock().await.len()
    }

    pub fn snapshotter(&self) -> &Snapshotter {
        &self.snapshotter
    }

    async fn name_of(&self, conn_id: &str) -> Option<String> {
        self.presence
            .lock()
            .await
            .name_of(conn_id)
            .map(str::to_owned)
    }
}
