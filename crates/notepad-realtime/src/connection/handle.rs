//! A single hub connection.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use notepad_core::types::UserId;

use crate::message::OutboundMessage;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// Sender side of one socket, plus who owns it.
///
/// Frames are serialized here and handed to the socket task through a
/// bounded channel. A full buffer drops the frame instead of blocking the
/// sender.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection id.
    pub id: ConnectionId,
    /// The authenticated user.
    pub user_id: UserId,
    /// Serialized outbound frames.
    sender: mpsc::Sender<String>,
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a handle around the sending half of a frame channel.
    pub fn new(user_id: UserId, sender: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            sender,
            alive: AtomicBool::new(true),
        }
    }

    /// Queue a frame. Returns `false` if it was not queued.
    pub fn send(&self, msg: &OutboundMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        let text = match serde_json::to_string(msg) {
            Ok(text) => text,
            Err(e) => {
                warn!(conn_id = %self.id, error = %e, "Failed to serialize hub frame");
                return false;
            }
        };
        match self.sender.try_send(text) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, "Send buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Whether the socket task is still draining frames.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Stop queueing frames for this connection.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
