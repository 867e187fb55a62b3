//! Connection pool: every live connection, indexed by user and by id.

use std::sync::Arc;

use dashmap::DashMap;

use notepad_core::types::UserId;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe index of live connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// One user may hold several connections (tabs, devices).
    by_user: DashMap<UserId, Vec<Arc<ConnectionHandle>>>,
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle.clone());
        self.by_user.entry(handle.user_id).or_default().push(handle);
    }

    /// Removes a connection, dropping the user entry when it was the last.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        if let Some(mut connections) = self.by_user.get_mut(&handle.user_id) {
            connections.retain(|c| c.id != *conn_id);
            if connections.is_empty() {
                drop(connections);
                self.by_user.remove_if(&handle.user_id, |_, v| v.is_empty());
            }
        }
        Some(handle)
    }

    /// Looks up a connection by id.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// The earliest connection a user still holds.
    pub fn oldest_for_user(&self, user_id: UserId) -> Option<Arc<ConnectionHandle>> {
        self.by_user
            .get(&user_id)
            .and_then(|connections| connections.first().cloned())
    }

    /// Number of connections a user currently holds.
    pub fn user_connection_count(&self, user_id: UserId) -> usize {
        self.by_user.get(&user_id).map(|c| c.len()).unwrap_or(0)
    }

    /// Total live connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Distinct connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }
}
