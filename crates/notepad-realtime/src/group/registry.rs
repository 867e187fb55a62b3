//! Group registry: which connections belong to which named group.

use std::collections::HashSet;

use dashmap::DashMap;

use notepad_core::types::UserId;

use crate::connection::ConnectionId;

/// Name of the group every connection of `user_id` joins.
pub fn user_group(user_id: UserId) -> String {
    format!("User_{user_id}")
}

/// Two-way index between groups and connections.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    members: DashMap<String, HashSet<ConnectionId>>,
    /// Reverse index so a disconnect can leave every group at once.
    memberships: DashMap<ConnectionId, HashSet<String>>,
}

impl GroupRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to a group. Returns `false` if already a member.
    pub fn join(&self, group: &str, conn_id: ConnectionId) -> bool {
        let added = self
            .members
            .entry(group.to_string())
            .or_default()
            .insert(conn_id);
        self.memberships
            .entry(conn_id)
            .or_default()
            .insert(group.to_string());
        added
    }

    /// Removes a connection from a group. Returns `false` if it was not a member.
    pub fn leave(&self, group: &str, conn_id: ConnectionId) -> bool {
        let removed = self.remove_member(group, conn_id);
        if let Some(mut groups) = self.memberships.get_mut(&conn_id) {
            groups.remove(group);
            if groups.is_empty() {
                drop(groups);
                self.memberships.remove_if(&conn_id, |_, g| g.is_empty());
            }
        }
        removed
    }

    /// Removes a connection from every group it joined.
    pub fn leave_all(&self, conn_id: ConnectionId) -> Vec<String> {
        let groups: Vec<String> = self
            .memberships
            .remove(&conn_id)
            .map(|(_, groups)| groups.into_iter().collect())
            .unwrap_or_default();
        for group in &groups {
            self.remove_member(group, conn_id);
        }
        groups
    }

    fn remove_member(&self, group: &str, conn_id: ConnectionId) -> bool {
        let Some(mut members) = self.members.get_mut(group) else {
            return false;
        };
        let removed = members.remove(&conn_id);
        if members.is_empty() {
            drop(members);
            self.members.remove_if(group, |_, m| m.is_empty());
        }
        removed
    }

    /// Connections in a group.
    pub fn members(&self, group: &str) -> Vec<ConnectionId> {
        self.members
            .get(group)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of non-empty groups.
    pub fn group_count(&self) -> usize {
        self.members.len()
    }
}
