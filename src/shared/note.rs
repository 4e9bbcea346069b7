/**
 * Note Data Structures
 *
 * This module defines the primary collaborative entity, the `Note`, along
 * with its append-only comment thread and the two intent payloads clients
 * send to mutate notes: `NoteDraft` (create) and `NotePatch` (partial update).
 *
 * # Timestamps
 *
 * Every revision carries a numeric `timestamp` (milliseconds since the Unix
 * epoch) set by whichever side produced it. The server trusts client-supplied
 * timestamps; clients use them for last-writer-wins reconciliation.
 *
 * # Wire Format
 *
 * Field names are serialized in camelCase (`updatedBy`, `editingBy`,
 * `editingAt`) so that browser clients can share the same payloads.
 */
use serde::{Deserialize, Deserializer, Serialize};

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A comment attached to a note
///
/// Comments are never mutated or removed once added. Merging is idempotent
/// by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment ID (UUID v4, assigned by the server)
    pub id: String,
    /// Display name of the author
    #[serde(default)]
    pub user: String,
    /// Comment body
    #[serde(default)]
    pub text: String,
    /// Creation time in milliseconds
    #[serde(default, deserialize_with = "millis")]
    pub timestamp: i64,
}

impl Comment {
    /// Create a new comment with a fresh ID and the current time
    pub fn new(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user: user.into(),
            text: text.into(),
            timestamp: now_millis(),
        }
    }
}

/// A positioned, titled note with a comment thread
///
/// `updated_by` and `editing_by` are advisory annotations only; they never
/// take part in conflict resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique note ID
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Horizontal canvas position
    #[serde(default)]
    pub x: f64,
    /// Vertical canvas position
    #[serde(default)]
    pub y: f64,
    /// Ordered, append-only comment thread
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Last-modified marker; absent values read as `0`
    #[serde(default, deserialize_with = "millis")]
    pub timestamp: i64,
    /// Display name of the last user who updated the note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Display name of the user currently editing the note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editing_by: Option<String>,
    /// When `editing_by` was last set
    #[serde(
        default,
        deserialize_with = "optional_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub editing_at: Option<i64>,
}

impl Note {
    /// Create a note from a draft
    ///
    /// Assigns a fresh UUID, stamps the current time, and records the author
    /// as `updated_by`. Fields missing from the draft get their defaults
    /// (empty text, origin position).
    pub fn from_draft(draft: NoteDraft, author: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: draft.title.unwrap_or_default(),
            content: draft.content.unwrap_or_default(),
            x: draft.x.unwrap_or_default(),
            y: draft.y.unwrap_or_default(),
            comments: Vec::new(),
            timestamp: now_millis(),
            updated_by: Some(author.into()),
            editing_by: None,
            editing_at: None,
        }
    }

    /// Whether a comment with this ID is already in the thread
    pub fn has_comment(&self, comment_id: &str) -> bool {
        self.comments.iter().any(|c| c.id == comment_id)
    }
}

/// Payload of a `note:create` intent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Payload of a `note:update` intent
///
/// Only the fields that are present are merged over the stored note.
/// `editing_by` and `editing_at` distinguish "absent" (`None`) from an
/// explicit `null` (`Some(None)`), which clears the annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    #[serde(
        default,
        deserialize_with = "optional_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<i64>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub editing_by: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub editing_at: Option<Option<i64>>,
}

impl NotePatch {
    /// An empty patch for the given note ID
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// A patch carrying every editable field of `note`
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: Some(note.title.clone()),
            content: Some(note.content.clone()),
            x: Some(note.x),
            y: Some(note.y),
            comments: None,
            timestamp: Some(note.timestamp),
            editing_by: Some(note.editing_by.clone()),
            editing_at: Some(note.editing_at),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Merge the present fields over `note`
    ///
    /// The timestamp is only changed when the patch carries one.
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(x) = self.x {
            note.x = x;
        }
        if let Some(y) = self.y {
            note.y = y;
        }
        if let Some(comments) = &self.comments {
            note.comments = comments.clone();
        }
        if let Some(timestamp) = self.timestamp {
            note.timestamp = timestamp;
        }
        if let Some(editing_by) = &self.editing_by {
            note.editing_by = editing_by.clone();
        }
        if let Some(editing_at) = self.editing_at {
            note.editing_at = editing_at;
        }
    }
}

/// Deserialize a present field (including `null`) as `Some(..)`
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A wire timestamp; fractional milliseconds are truncated
#[derive(Deserialize)]
#[serde(untagged)]
enum Millis {
    Whole(i64),
    Fractional(f64),
}

impl From<Millis> for i64 {
    fn from(value: Millis) -> Self {
        match value {
            Millis::Whole(ms) => ms,
            Millis::Fractional(ms) => ms as i64,
        }
    }
}

fn millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Millis::deserialize(deserializer).map(i64::from)
}

fn optional_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Millis>::deserialize(deserializer)?.map(i64::from))
}

fn nullable_millis<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_millis(deserializer).map(Some)
}
