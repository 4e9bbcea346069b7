/**
 * Persistence Snapshotter
 *
 * This module stores the full set of notes in a single JSON document and
 * restores it on startup.
 *
 * # Debounce
 *
 * Every mutation calls `schedule` with the current notes. A single writer
 * task holds the most recent snapshot and waits until no new request has
 * arrived for the debounce window before writing it. A burst of mutations
 * therefore produces one write containing the latest state. Snapshots
 * handed to the writer are owned copies, so a write never observes a
 * half-applied mutation.
 *
 * # File Format
 *
 * ```json
 * { "version": 1, "notes": [ ... ] }
 * ```
 *
 * `version` is optional on read. Writes go to a sibling `.tmp` file which is
 * then renamed over the target, so a crash mid-write leaves the previous
 * snapshot intact.
 *
 * # Failure Handling
 *
 * Write failures are logged and counted; they never stop the server and
 * the next scheduled write tries again. A missing file on load means an
 * empty board; any other load failure is logged and also yields an empty
 * board.
 */
use crate::backend::error::BackendError;
use crate::shared::Note;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Default quiet period before a scheduled snapshot is written
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// On-disk representation of the board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl BoardSnapshot {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            notes,
        }
    }
}

/// Read a snapshot from disk
///
/// Returns `Ok(None)` if the file does not exist.
pub async fn read_snapshot(path: &Path) -> Result<Option<BoardSnapshot>, BackendError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(BackendError::persistence(path, e)),
    };
    let snapshot = serde_json::from_str(&raw)?;
    Ok(Some(snapshot))
}

/// Write a snapshot atomically, creating the parent directory if needed
pub async fn write_snapshot(path: &Path, snapshot: &BoardSnapshot) -> Result<(), BackendError> {
    let payload = serde_json::to_string_pretty(snapshot)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| BackendError::persistence(parent, e))?;
    }

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, payload)
        .await
        .map_err(|e| BackendError::persistence(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| BackendError::persistence(path, e))?;
    Ok(())
}

/// Load the notes persisted at `path`
///
/// Never fails: a missing file is an empty board, and an unreadable or
/// corrupt file is logged and treated as empty.
pub async fn load_persisted_state(path: &Path) -> Vec<Note> {
    match read_snapshot(path).await {
        Ok(Some(snapshot)) => {
            info!(
                "[Snapshot] Restored {} notes from {}",
                snapshot.notes.len(),
                path.display()
            );
            snapshot.notes
        }
        Ok(None) => {
            info!("[Snapshot] No snapshot at {}, starting empty", path.display());
            Vec::new()
        }
        Err(e) => {
            warn!("[Snapshot] Could not load {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write counters, observable from tests and the health endpoint
#[derive(Debug, Default)]
pub struct SnapshotStats {
    writes: AtomicU64,
    failures: AtomicU64,
}

impl SnapshotStats {
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

enum SnapshotCommand {
    Schedule(Vec<Note>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the debounced snapshot writer
///
/// Cloning the handle shares the same writer. The writer task exits after
/// the last handle is dropped, writing any pending snapshot first.
#[derive(Clone)]
pub struct Snapshotter {
    tx: mpsc::UnboundedSender<SnapshotCommand>,
    stats: Arc<SnapshotStats>,
    path: Arc<PathBuf>,
}

impl Snapshotter {
    /// Spawn the writer task for `path`
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(path: impl Into<PathBuf>, debounce: Duration) -> Self {
        let path = Arc::new(path.into());
        let stats = Arc::new(SnapshotStats::default());
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(run_writer(path.clone(), debounce, rx, stats.clone()));

        Self { tx, stats, path }
    }

    /// Request a write of `notes`, replacing any pending request
    pub fn schedule(&self, notes: Vec<Note>) {
        if self.tx.send(SnapshotCommand::Schedule(notes)).is_err() {
            warn!("[Snapshot] Writer task is gone, snapshot dropped");
        }
    }

    /// Write any pending snapshot now and wait for it to finish
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(SnapshotCommand::Flush(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.await;
    }

    pub fn stats(&self) -> &SnapshotStats {
        &self.stats
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn run_writer(
    path: Arc<PathBuf>,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<SnapshotCommand>,
    stats: Arc<SnapshotStats>,
) {
    let mut pending: Option<Vec<Note>> = None;
    let timer = tokio::time::sleep(debounce);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            command = rx.recv() => match command {
                Some(SnapshotCommand::Schedule(notes)) => {
                    pending = Some(notes);
                    timer.as_mut().reset(Instant::now() + debounce);
                }
                Some(SnapshotCommand::Flush(ack)) => {
                    if let Some(notes) = pending.take() {
                        persist(&path, notes, &stats).await;
                    }
                    let _ = ack.send(());
                }
                None => {
                    if let Some(notes) = pending.take() {
                        persist(&path, notes, &stats).await;
                    }
                    debug!("[Snapshot] Writer for {} stopped", path.display());
                    break;
                }
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(notes) = pending.take() {
                    persist(&path, notes, &stats).await;
                }
            }
        }
    }
}

async fn persist(path: &Path, notes: Vec<Note>, stats: &SnapshotStats) {
    let count = notes.len();
    match write_snapshot(path, &BoardSnapshot::new(notes)).await {
        Ok(()) => {
            stats.writes.fetch_add(1, Ordering::Relaxed);
            debug!("[Snapshot] Wrote {} notes to {}", count, path.display());
        }
        Err(e) => {
            stats.failures.fetch_add(1, Ordering::Relaxed);
            warn!("[Snapshot] Failed to save board: {}", e);
        }
    }
}
