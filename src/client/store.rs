/**
 * Client Note Store
 *
 * The client's local, possibly stale, replica of the board. Events from the
 * server are merged into it with last-writer-wins on the note `timestamp`;
 * the client's own optimistic edits bypass the check.
 *
 * # Merge Rules
 *
 * - `upsert_remote` applies the incoming note if the note is unknown or
 *   `incoming.timestamp >= local.timestamp`. Equal timestamps let the server
 *   echo of a local edit be applied.
 * - `add_comment_remote` is idempotent by comment ID and a no-op for unknown
 *   notes.
 * - `set_all` replaces everything (used for `board:data` after every
 *   (re)connect).
 *
 * # Ordering
 *
 * `list` returns notes ordered by ascending timestamp, ties broken by ID.
 */
use crate::shared::{Comment, Note};
use std::collections::HashMap;

/// Local note replica
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    notes: HashMap<String, Note>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole store
    ///
    /// If `notes` repeats an ID, the last occurrence wins.
    pub fn set_all(&mut self, notes: Vec<Note>) {
        self.notes = notes.into_iter().map(|n| (n.id.clone(), n)).collect();
    }

    /// Apply a local edit unconditionally
    pub fn upsert_local(&mut self, note: Note) {
        self.notes.insert(note.id.clone(), note);
    }

    /// Apply a note received from the server, subject to last-writer-wins
    ///
    /// Returns whether the note was applied.
    pub fn upsert_remote(&mut self, note: Note) -> bool {
        if let Some(existing) = self.notes.get(&note.id) {
            if note.timestamp < existing.timestamp {
                tracing::debug!(
                    "[Sync] Ignoring stale revision of {} ({} < {})",
                    note.id,
                    note.timestamp,
                    existing.timestamp
                );
                return false;
            }
        }
        self.notes.insert(note.id.clone(), note);
        true
    }

    /// Remove a note; no-op if absent
    pub fn remove(&mut self, id: &str) -> Option<Note> {
        self.notes.remove(id)
    }

    /// Append a comment unless the note is unknown or already has it
    ///
    /// Returns whether the comment was added.
    pub fn add_comment_remote(&mut self, note_id: &str, comment: Comment) -> bool {
        match self.notes.get_mut(note_id) {
            Some(note) if !note.has_comment(&comment.id) => {
                note.comments.push(comment);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    /// Notes ordered by `(timestamp, id)`
    pub fn list(&self) -> Vec<Note> {
        let mut notes: Vec<Note> = self.notes.values().cloned().collect();
        notes.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
