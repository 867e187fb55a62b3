//! Per-user notification preference storage.

use std::sync::Arc;

use tracing::info;

use notepad_core::error::AppError;
use notepad_database::PreferenceStore;
use notepad_entity::notification::{NotificationPreferences, UpdatePreferences};

use crate::context::RequestContext;

/// Reads and writes the caller's notification switches.
#[derive(Debug, Clone)]
pub struct PreferenceService {
    store: Arc<dyn PreferenceStore>,
}

impl PreferenceService {
    /// Creates a new preference service.
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// The caller's preferences, created with defaults on first read.
    pub async fn get(&self, ctx: &RequestContext) -> Result<NotificationPreferences, AppError> {
        if let Some(existing) = self.store.find(ctx.user_id).await? {
            return Ok(existing);
        }
        let created = self.store.create_default(ctx.user_id).await?;
        info!(user_id = %ctx.user_id, "Created default notification preferences");
        Ok(created)
    }

    /// Overwrite the caller's preferences. Fails with not-found if they were
    /// never created.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        data: UpdatePreferences,
    ) -> Result<NotificationPreferences, AppError> {
        self.store
            .update(ctx.user_id, data)
            .await?
            .ok_or_else(|| AppError::not_found("Notification preferences not found"))
    }
}
