//! The note shape returned by the REST API.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use notepad_core::types::{NoteId, UserId};
use notepad_entity::note::{Note, NoteStatus};
use notepad_entity::user::User;

/// A note together with its owner's username and a display label.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedNote {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub owner_id: UserId,
    pub status: NoteStatus,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owner username, when the owner still exists.
    pub owner: Option<String>,
    pub status_text: &'static str,
}

impl FormattedNote {
    /// Format a note with an optional owner name.
    pub fn new(note: Note, owner: Option<String>) -> Self {
        Self {
            id: note.id,
            status_text: note.status.as_str(),
            title: note.title,
            content: note.content,
            category: note.category,
            owner_id: note.owner_id,
            status: note.status,
            is_public: note.is_public,
            created_at: note.created_at,
            updated_at: note.updated_at,
            owner,
        }
    }

    /// Format many notes, resolving owner names from `owners`.
    pub fn many(notes: Vec<Note>, owners: &[User]) -> Vec<Self> {
        let names: HashMap<UserId, &str> = owners
            .iter()
            .map(|u| (u.id, u.username.as_str()))
            .collect();
        notes
            .into_iter()
            .map(|note| {
                let owner = names.get(&note.owner_id).map(|s| s.to_string());
                Self::new(note, owner)
            })
            .collect()
    }
}
