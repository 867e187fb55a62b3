//! The notification hub: connection lifecycle, group checks, and delivery.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use notepad_core::config::RealtimeConfig;
use notepad_core::types::UserId;
use notepad_entity::notification::Notification;
use notepad_service::NotificationPusher;

use crate::connection::{ConnectionHandle, ConnectionId, ConnectionPool};
use crate::group::{GroupRegistry, user_group};
use crate::message::{InboundMessage, OutboundMessage};

const FORBIDDEN_GROUP: &str = "Unauthorized group access";

/// Shared state behind `/notificationHub`.
#[derive(Debug)]
pub struct NotificationHub {
    pool: ConnectionPool,
    groups: GroupRegistry,
    config: RealtimeConfig,
}

impl NotificationHub {
    /// Creates an empty hub.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            pool: ConnectionPool::new(),
            groups: GroupRegistry::new(),
            config,
        }
    }

    /// Register an authenticated connection and join it to its user's group.
    ///
    /// The receiver yields serialized frames for the socket. It closes once
    /// the connection is unregistered or evicted.
    pub fn register(&self, user_id: UserId) -> (ConnectionId, mpsc::Receiver<String>) {
        let limit = self.config.max_connections_per_user.max(1);
        while self.pool.user_connection_count(user_id) >= limit {
            let Some(oldest) = self.pool.oldest_for_user(user_id) else {
                break;
            };
            info!(user_id = %user_id, conn_id = %oldest.id, "Evicting oldest hub connection");
            self.unregister(oldest.id);
        }

        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(user_id, tx));
        let conn_id = handle.id;
        self.pool.add(handle);
        self.groups.join(&user_group(user_id), conn_id);
        info!(user_id = %user_id, conn_id = %conn_id, "Hub connection registered");
        (conn_id, rx)
    }

    /// Drop a connection and every group membership it holds.
    pub fn unregister(&self, conn_id: ConnectionId) {
        let groups = self.groups.leave_all(conn_id);
        if let Some(handle) = self.pool.remove(&conn_id) {
            handle.mark_dead();
            info!(
                user_id = %handle.user_id,
                conn_id = %conn_id,
                groups = groups.len(),
                "Hub connection closed"
            );
        }
    }

    /// Process one text frame from a connection.
    pub fn handle_inbound(&self, conn_id: ConnectionId, text: &str) {
        let Some(handle) = self.pool.get(&conn_id) else {
            return;
        };
        let msg: InboundMessage = match serde_json::from_str(text) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(conn_id = %conn_id, error = %e, "Malformed hub frame");
                handle.send(&OutboundMessage::error("INVALID_MESSAGE", e.to_string()));
                return;
            }
        };

        match msg {
            InboundMessage::Ping => {
                handle.send(&OutboundMessage::Pong);
            }
            InboundMessage::JoinUserGroup { user_id } => {
                if !self.authorize(&handle, user_id) {
                    return;
                }
                let group = user_group(user_id);
                self.groups.join(&group, conn_id);
                handle.send(&OutboundMessage::Joined { group });
            }
            InboundMessage::LeaveUserGroup { user_id } => {
                if !self.authorize(&handle, user_id) {
                    return;
                }
                let group = user_group(user_id);
                self.groups.leave(&group, conn_id);
                handle.send(&OutboundMessage::Left { group });
            }
            InboundMessage::SendNotification {
                user_id,
                notification,
            } => {
                if !self.authorize(&handle, user_id) {
                    return;
                }
                self.send_to_group(
                    &user_group(user_id),
                    &OutboundMessage::ReceiveNotification { notification },
                );
            }
        }
    }

    fn authorize(&self, handle: &ConnectionHandle, target: UserId) -> bool {
        if handle.user_id == target {
            return true;
        }
        warn!(
            user_id = %handle.user_id,
            target = %target,
            "Rejected hub group access for another user"
        );
        handle.send(&OutboundMessage::error("FORBIDDEN", FORBIDDEN_GROUP));
        false
    }

    /// Send a frame to every connection in a group. Returns how many were reached.
    pub fn send_to_group(&self, group: &str, msg: &OutboundMessage) -> usize {
        self.groups
            .members(group)
            .into_iter()
            .filter_map(|conn_id| self.pool.get(&conn_id))
            .filter(|handle| handle.send(msg))
            .count()
    }

    /// Live connections.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Users with at least one live connection.
    pub fn online_user_count(&self) -> usize {
        self.pool.user_count()
    }
}

#[async_trait]
impl NotificationPusher for NotificationHub {
    async fn push(&self, user: UserId, notification: &Notification) -> usize {
        let payload = match serde_json::to_value(notification) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(notification_id = %notification.id, error = %e, "Failed to encode notification");
                return 0;
            }
        };
        let reached = self.send_to_group(
            &user_group(user),
            &OutboundMessage::ReceiveNotification {
                notification: payload,
            },
        );
        debug!(user_id = %user, reached, "Notification pushed");
        reached
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use notepad_core::types::{NoteId, NotificationId};
    use notepad_entity::notification::NotificationType;
    use serde_json::Value;

    use super::*;

    fn hub(max_per_user: usize) -> NotificationHub {
        NotificationHub::new(RealtimeConfig {
            max_connections_per_user: max_per_user,
            ..RealtimeConfig::default()
        })
    }

    fn next(rx: &mut mpsc::Receiver<String>) -> Value {
        let text = rx.try_recv().expect("frame queued");
        serde_json::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn test_push_reaches_only_recipient_group() {
        let hub = hub(5);
        let (_a, mut rx_alice) = hub.register(UserId(1));
        let (_b, mut rx_bob) = hub.register(UserId(2));

        let notification = Notification {
            id: NotificationId(9),
            user_id: UserId(2),
            message: "alice shared a note with you: Plan".to_string(),
            notification_type: NotificationType::NoteShared,
            note_id: Some(NoteId(3)),
            created_at: Utc::now(),
            is_read: false,
        };
        assert_eq!(hub.push(UserId(2), &notification).await, 1);

        let frame = next(&mut rx_bob);
        assert_eq!(frame["type"], "receive_notification");
        assert_eq!(frame["notification"]["type"], "NoteShared");
        assert!(rx_alice.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_foreign_group_join_is_forbidden() {
        let hub = hub(5);
        let (conn, mut rx) = hub.register(UserId(1));

        hub.handle_inbound(conn, r#"{"type":"join_user_group","user_id":2}"#);
        let frame = next(&mut rx);
        assert_eq!(frame["type"], "error");
        assert_eq!(frame["code"], "FORBIDDEN");
        assert_eq!(frame["message"], "Unauthorized group access");

        hub.handle_inbound(conn, r#"{"type":"join_user_group","user_id":1}"#);
        assert_eq!(next(&mut rx)["group"], "User_1");

        hub.handle_inbound(conn, r#"{"type":"ping"}"#);
        assert_eq!(next(&mut rx)["type"], "pong");

        hub.handle_inbound(conn, "not json");
        assert_eq!(next(&mut rx)["code"], "INVALID_MESSAGE");
    }

    #[tokio::test]
    async fn test_unregister_leaves_groups() {
        let hub = hub(5);
        let (conn, _rx) = hub.register(UserId(1));
        assert_eq!(hub.connection_count(), 1);
        assert_eq!(hub.online_user_count(), 1);

        hub.unregister(conn);
        assert_eq!(hub.connection_count(), 0);
        assert_eq!(hub.online_user_count(), 0);
        assert_eq!(
            hub.send_to_group(&user_group(UserId(1)), &OutboundMessage::Pong),
            0
        );
    }

    #[tokio::test]
    async fn test_oldest_connection_is_evicted() {
        let hub = hub(2);
        let (_first, mut rx_first) = hub.register(UserId(1));
        let (_second, _rx_second) = hub.register(UserId(1));
        let (_third, _rx_third) = hub.register(UserId(1));

        assert_eq!(hub.connection_count(), 2);
        // The evicted connection's channel is closed once its sender is gone.
        assert!(rx_first.recv().await.is_none());
    }
}
