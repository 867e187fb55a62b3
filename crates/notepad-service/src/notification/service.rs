//! Notification creation, fan-out delivery, and read-state management.

use std::sync::Arc;

use tracing::{debug, info};

use notepad_core::config::NotificationConfig;
use notepad_core::error::AppError;
use notepad_core::types::NotificationId;
use notepad_database::NotificationStore;
use notepad_entity::notification::{CreateNotification, Notification};

use crate::context::RequestContext;

use super::pusher::NotificationPusher;

/// Manages user notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    pusher: Arc<dyn NotificationPusher>,
    config: NotificationConfig,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        pusher: Arc<dyn NotificationPusher>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            store,
            pusher,
            config,
        }
    }

    /// Number of recipients processed per fan-out batch.
    pub fn fanout_batch_size(&self) -> i64 {
        self.config.fanout_batch_size.max(1)
    }

    /// Lists the latest notifications for the current user, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<Notification>, AppError> {
        self.store
            .list_for_user(ctx.user_id, self.config.list_limit)
            .await
    }

    /// Counts the current user's unread notifications.
    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<i64, AppError> {
        self.store.unread_count(ctx.user_id).await
    }

    /// Marks one notification read. Only the recipient may do so.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        id: NotificationId,
    ) -> Result<Notification, AppError> {
        self.store
            .mark_read(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }

    /// Marks all of the current user's notifications read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        let changed = self.store.mark_all_read(ctx.user_id).await?;
        debug!(user_id = %ctx.user_id, changed, "Marked all notifications read");
        Ok(changed)
    }

    /// Stores one notification and pushes it to the recipient's group.
    pub async fn notify(&self, data: CreateNotification) -> Result<Notification, AppError> {
        let stored = self.store.create(&data).await?;
        let delivered = self.pusher.push(stored.user_id, &stored).await;
        info!(
            notification_id = %stored.id,
            user_id = %stored.user_id,
            kind = stored.notification_type.as_str(),
            delivered,
            "Notification sent"
        );
        Ok(stored)
    }

    /// Stores a batch of notifications in one insert, then pushes each.
    /// Returns how many were stored.
    pub async fn notify_batch(&self, batch: Vec<CreateNotification>) -> Result<usize, AppError> {
        if batch.is_empty() {
            return Ok(0);
        }
        let stored = self.store.create_many(&batch).await?;
        let mut delivered = 0;
        for notification in &stored {
            delivered += self.pusher.push(notification.user_id, notification).await;
        }
        debug!(stored = stored.len(), delivered, "Notification batch sent");
        Ok(stored.len())
    }
}
