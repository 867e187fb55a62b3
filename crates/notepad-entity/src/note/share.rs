//! Note share (collaborator grant) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notepad_core::types::{NoteId, UserId};

/// One collaborator's read grant on a note. `(note_id, user_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NoteShare {
    /// Row identifier.
    pub id: i32,
    /// The shared note.
    pub note_id: NoteId,
    /// The collaborator.
    pub user_id: UserId,
    /// When the grant was made.
    pub shared_at: DateTime<Utc>,
}
