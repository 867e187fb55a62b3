//! Note repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notepad_core::error::{AppError, ErrorKind};
use notepad_core::result::AppResult;
use notepad_core::types::{NoteId, UserId};
use notepad_entity::note::{CreateNote, Note};

use crate::store::{NoteStats, NoteStore};

/// Repository for notes.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    pool: PgPool,
}

impl NoteRepository {
    /// Create a new note repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for NoteRepository {
    async fn create(&self, data: &CreateNote) -> AppResult<Note> {
        sqlx::query_as::<_, Note>(
            "INSERT INTO notes (title, content, category, owner_id, status, is_public) \
             VALUES ($1, $2, $3, $4, 'Personal', FALSE) RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.category)
        .bind(data.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create note", e))
    }

    async fn find_by_id(&self, id: NoteId) -> AppResult<Option<Note>> {
        sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find note", e))
    }

    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<Note>> {
        sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notes", e))
    }

    async fn list_shared_with(&self, user: UserId) -> AppResult<Vec<Note>> {
        sqlx::query_as::<_, Note>(
            "SELECT n.* FROM notes n \
             INNER JOIN note_shares s ON s.note_id = n.id \
             WHERE s.user_id = $1 \
             ORDER BY n.updated_at DESC, n.id DESC",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shared notes", e))
    }

    async fn list_public(&self) -> AppResult<Vec<Note>> {
        sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE is_public ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list public notes", e))
    }

    async fn update(&self, note: &Note) -> AppResult<Note> {
        sqlx::query_as::<_, Note>(
            "UPDATE notes SET title = $2, content = $3, category = $4, status = $5, \
             is_public = $6, updated_at = $7 WHERE id = $1 RETURNING *",
        )
        .bind(note.id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.category)
        .bind(note.status)
        .bind(note.is_public)
        .bind(note.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update note", e))
    }

    async fn delete(&self, id: NoteId) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM note_shares WHERE note_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete note shares", e)
            })?;

        sqlx::query("DELETE FROM notifications WHERE note_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete note notifications", e)
            })?;

        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete note", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit note delete", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> AppResult<NoteStats> {
        let row: (i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT \
                (SELECT COUNT(*) FROM notes), \
                (SELECT COUNT(*) FROM notes WHERE status = 'Public'), \
                (SELECT COUNT(*) FROM notes WHERE status = 'Shared'), \
                (SELECT COUNT(*) FROM note_shares), \
                (SELECT COUNT(*) FROM users)",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to compute note stats", e))?;

        Ok(NoteStats {
            total_notes: row.0,
            public_notes: row.1,
            shared_notes: row.2,
            note_shares: row.3,
            users: row.4,
        })
    }
}
