/**
 * Note Repository
 *
 * This module holds the authoritative in-memory copy of the board: the
 * ordered set of notes, keyed by note ID. It is the single source of truth
 * for the running process; the snapshotter persists it and the gateway
 * broadcasts the records it returns.
 *
 * # Ordering
 *
 * Notes are kept in creation order, which is the order `board:data`
 * reports them in.
 *
 * # Timestamps
 *
 * `update` never bumps the timestamp on its own. A client-supplied
 * timestamp is trusted as-is; clients reconcile with last-writer-wins.
 */
use crate::backend::error::BackendError;
use crate::shared::{Comment, Note, NoteDraft, NotePatch};

/// Author recorded when a connection never joined with a name
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// In-memory mapping of note ID to note record
#[derive(Debug, Clone, Default)]
pub struct NoteRepository {
    notes: Vec<Note>,
}

impl NoteRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository from restored notes
    ///
    /// If the same ID appears more than once the last record wins and keeps
    /// the position of the first.
    pub fn from_notes(notes: Vec<Note>) -> Self {
        let mut repository = Self::new();
        for note in notes {
            match repository.position(&note.id) {
                Some(index) => repository.notes[index] = note,
                None => repository.notes.push(note),
            }
        }
        repository
    }

    /// Create a note from a draft; always succeeds
    pub fn create(&mut self, draft: NoteDraft, author: &str) -> Note {
        let note = Note::from_draft(draft, author);
        self.notes.push(note.clone());
        note
    }

    /// Merge a partial update over the stored note
    ///
    /// `actor` is recorded as `updated_by`, replacing whatever the patch or
    /// the previous revision carried.
    ///
    /// # Errors
    ///
    /// `NotFound` if no note has the patch's ID. Nothing is changed.
    pub fn update(&mut self, patch: &NotePatch, actor: Option<&str>) -> Result<Note, BackendError> {
        let index = self
            .position(&patch.id)
            .ok_or_else(|| BackendError::not_found(&patch.id))?;

        let note = &mut self.notes[index];
        patch.apply_to(note);
        note.updated_by = actor.map(str::to_owned);
        Ok(note.clone())
    }

    /// Remove a note; returns whether it existed
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() != before
    }

    /// Append a new comment to a note's thread
    ///
    /// # Errors
    ///
    /// `NotFound` if the note does not exist.
    pub fn add_comment(
        &mut self,
        note_id: &str,
        author: &str,
        text: impl Into<String>,
    ) -> Result<Comment, BackendError> {
        let index = self
            .position(note_id)
            .ok_or_else(|| BackendError::not_found(note_id))?;

        let comment = Comment::new(author, text);
        self.notes[index].comments.push(comment.clone());
        Ok(comment)
    }

    /// All notes in creation order
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    /// Owned copy of every note, for snapshots and `board:data`
    pub fn snapshot(&self) -> Vec<Note> {
        self.notes.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }
}
