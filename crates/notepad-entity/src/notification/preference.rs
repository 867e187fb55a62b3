//! Notification preference entity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notepad_core::types::UserId;

/// Per-user notification switches. Stored and returned, not yet consulted
/// when notifications are emitted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    /// Row identifier.
    pub id: i32,
    /// Owner of the preferences.
    pub user_id: UserId,
    /// Notify when another user publishes a note.
    pub notify_on_public: bool,
    /// Notify when a note is shared with this user.
    pub notify_on_shared: bool,
    /// Also send notifications by email.
    pub email_notifications: bool,
}

/// New values for a user's preferences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferences {
    /// Notify when another user publishes a note.
    pub notify_on_public: bool,
    /// Notify when a note is shared with this user.
    pub notify_on_shared: bool,
    /// Also send notifications by email.
    pub email_notifications: bool,
}

impl Default for UpdatePreferences {
    fn default() -> Self {
        Self {
            notify_on_public: true,
            notify_on_shared: true,
            email_notifications: false,
        }
    }
}
