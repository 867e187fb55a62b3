//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notepad_core::error::{AppError, ErrorKind};
use notepad_core::result::AppResult;
use notepad_core::types::{NoteId, NotificationId, UserId};
use notepad_entity::notification::{CreateNotification, Notification};

use crate::store::NotificationStore;

/// Repository for notification rows.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, data: &CreateNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, message, notification_type, note_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.message)
        .bind(data.notification_type)
        .bind(data.note_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    async fn create_many(&self, data: &[CreateNotification]) -> AppResult<Vec<Notification>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let mut user_ids = Vec::with_capacity(data.len());
        let mut messages = Vec::with_capacity(data.len());
        let mut kinds = Vec::with_capacity(data.len());
        let mut note_ids = Vec::with_capacity(data.len());
        for n in data {
            user_ids.push(n.user_id.get());
            messages.push(n.message.clone());
            kinds.push(n.notification_type.as_str().to_string());
            note_ids.push(n.note_id.map(NoteId::get));
        }

        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, message, notification_type, note_id) \
             SELECT u, m, t::notification_type, n \
             FROM UNNEST($1::int4[], $2::text[], $3::text[], $4::int4[]) AS x(u, m, t, n) \
             RETURNING *",
        )
        .bind(user_ids)
        .bind(messages)
        .bind(kinds)
        .bind(note_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert notification batch", e)
        })
    }

    async fn list_for_user(&self, user: UserId, limit: i64) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(user)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user: UserId,
    ) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark notification read", e)
        })
    }

    async fn mark_all_read(&self, user: UserId) -> AppResult<u64> {
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read")
            .bind(user)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to mark notifications read", e)
            })
    }

    async fn unread_count(&self, user: UserId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    async fn count_for_note(&self, note: NoteId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE note_id = $1")
            .bind(note)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
            })
    }
}
