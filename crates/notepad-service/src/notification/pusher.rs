//! Delivery seam between the service layer and the realtime hub.

use async_trait::async_trait;

use notepad_core::types::UserId;
use notepad_entity::notification::Notification;

/// Pushes a stored notification to a user's live connections.
///
/// Delivery is best-effort. Users who are offline read their notifications
/// through the REST listing instead.
#[async_trait]
pub trait NotificationPusher: Send + Sync + std::fmt::Debug + 'static {
    /// Send `notification` to every connection in `user`'s group. Returns
    /// the number of connections reached.
    async fn push(&self, user: UserId, notification: &Notification) -> usize;
}

/// Pusher that delivers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPusher;

#[async_trait]
impl NotificationPusher for NoopPusher {
    async fn push(&self, _user: UserId, _notification: &Notification) -> usize {
        0
    }
}
