//! Note entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notepad_core::types::{NoteId, UserId};

use super::status::NoteStatus;

/// A note owned by one user.
///
/// `is_public` duplicates `status == Public` for API compatibility. It is
/// only ever written through [`Note::apply_status`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique note identifier.
    pub id: NoteId,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Optional free-form category.
    pub category: Option<String>,
    /// The owning user.
    pub owner_id: UserId,
    /// Visibility status.
    pub status: NoteStatus,
    /// Mirror of `status == Public`.
    pub is_public: bool,
    /// When the note was created.
    pub created_at: DateTime<Utc>,
    /// When the note was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Set the status and its mirrored flag together.
    pub fn apply_status(&mut self, status: NoteStatus) {
        self.status = status;
        self.is_public = status.is_public();
    }

    /// Whether `user_id` owns this note.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Data required to create a new note.
#[derive(Debug, Clone)]
pub struct CreateNote {
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Optional category.
    pub category: Option<String>,
    /// The owning user.
    pub owner_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_status_keeps_flag_in_sync() {
        let now = Utc::now();
        let mut note = Note {
            id: NoteId(1),
            title: "t".to_string(),
            content: "c".to_string(),
            category: None,
            owner_id: UserId(1),
            status: NoteStatus::Personal,
            is_public: false,
            created_at: now,
            updated_at: now,
        };

        note.apply_status(NoteStatus::Public);
        assert!(note.is_public);
        assert_eq!(note.status, NoteStatus::Public);

        note.apply_status(NoteStatus::Shared);
        assert!(!note.is_public);
    }
}
