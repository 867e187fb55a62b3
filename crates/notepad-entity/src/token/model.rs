//! Opaque session token row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notepad_core::types::UserId;

/// A bearer token issued at login or registration.
///
/// A request is authenticated only while `expires_at` lies in the future
/// and the `UserId` header names the same user the token was issued to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserToken {
    /// Row identifier.
    pub id: i32,
    /// The user this token authenticates.
    pub user_id: UserId,
    /// The raw token string.
    pub token: String,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl UserToken {
    /// Whether the token is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
