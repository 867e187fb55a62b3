//! Notification preference repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notepad_core::error::{AppError, ErrorKind};
use notepad_core::result::AppResult;
use notepad_core::types::UserId;
use notepad_entity::notification::{NotificationPreferences, UpdatePreferences};

use crate::store::PreferenceStore;

/// Repository for `user_notification_preferences`.
#[derive(Debug, Clone)]
pub struct PreferenceRepository {
    pool: PgPool,
}

impl PreferenceRepository {
    /// Create a new preference repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceStore for PreferenceRepository {
    async fn find(&self, user: UserId) -> AppResult<Option<NotificationPreferences>> {
        sqlx::query_as::<_, NotificationPreferences>(
            "SELECT * FROM user_notification_preferences WHERE user_id = $1",
        )
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load preferences", e))
    }

    async fn create_default(&self, user: UserId) -> AppResult<NotificationPreferences> {
        let defaults = UpdatePreferences::default();
        // A no-op update on conflict lets RETURNING yield the existing row.
        sqlx::query_as::<_, NotificationPreferences>(
            "INSERT INTO user_notification_preferences \
             (user_id, notify_on_public, notify_on_shared, email_notifications) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id \
             RETURNING *",
        )
        .bind(user)
        .bind(defaults.notify_on_public)
        .bind(defaults.notify_on_shared)
        .bind(defaults.email_notifications)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create preferences", e))
    }

    async fn update(
        &self,
        user: UserId,
        data: UpdatePreferences,
    ) -> AppResult<Option<NotificationPreferences>> {
        sqlx::query_as::<_, NotificationPreferences>(
            "UPDATE user_notification_preferences SET notify_on_public = $2, \
             notify_on_shared = $3, email_notifications = $4 WHERE user_id = $1 RETURNING *",
        )
        .bind(user)
        .bind(data.notify_on_public)
        .bind(data.notify_on_shared)
        .bind(data.email_notifications)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update preferences", e))
    }
}
