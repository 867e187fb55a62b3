//! Inbound and outbound hub frame definitions.

use serde::{Deserialize, Serialize};

use notepad_core::types::UserId;

/// Frames sent by the client to the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Join the group of a user. Only the caller's own group is allowed.
    JoinUserGroup {
        /// Whose group.
        user_id: UserId,
    },
    /// Leave the group of a user.
    LeaveUserGroup {
        /// Whose group.
        user_id: UserId,
    },
    /// Relay a payload to a user's group.
    SendNotification {
        /// Target user.
        user_id: UserId,
        /// Opaque payload forwarded as-is.
        notification: serde_json::Value,
    },
    /// Keep-alive.
    Ping,
}

/// Frames sent by the hub to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// A notification addressed to the connection's user.
    ReceiveNotification {
        /// The notification as the REST listing renders it.
        notification: serde_json::Value,
    },
    /// Group join confirmed.
    Joined {
        /// Group name.
        group: String,
    },
    /// Group leave confirmed.
    Left {
        /// Group name.
        group: String,
    },
    /// Reply to a ping.
    Pong,
    /// Something the client sent was rejected.
    Error {
        /// Machine-readable code.
        code: String,
        /// Human-readable message.
        message: String,
    },
}

impl OutboundMessage {
    /// Build an error frame.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}
