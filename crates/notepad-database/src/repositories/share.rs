//! Note share repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notepad_core::error::{AppError, ErrorKind};
use notepad_core::result::AppResult;
use notepad_core::types::{NoteId, UserId};
use notepad_entity::note::NoteShare;

use crate::store::ShareStore;

/// Repository for collaborator grants.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn insert_if_absent(&self, note: NoteId, user: UserId) -> AppResult<Option<NoteShare>> {
        // The unique (note_id, user_id) constraint makes concurrent shares collapse to one row.
        sqlx::query_as::<_, NoteShare>(
            "INSERT INTO note_shares (note_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (note_id, user_id) DO NOTHING RETURNING *",
        )
        .bind(note)
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to share note", e))
    }

    async fn count_for_note(&self, note: NoteId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM note_shares WHERE note_id = $1")
            .bind(note)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count shares", e))
    }
}
