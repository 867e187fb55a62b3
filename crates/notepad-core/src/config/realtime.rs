//! Notification emission and hub configuration.

use serde::{Deserialize, Serialize};

/// Notification hub (WebSocket) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Route the hub is mounted on.
    #[serde(default = "default_hub_path")]
    pub hub_path: String,
    /// Outbound buffer per connection. Messages beyond it are dropped.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Maximum concurrent hub connections per user; the oldest is evicted.
    #[serde(default = "default_max_connections_per_user")]
    pub max_connections_per_user: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            hub_path: default_hub_path(),
            channel_buffer_size: default_channel_buffer(),
            max_connections_per_user: default_max_connections_per_user(),
        }
    }
}

/// How notifications are produced and listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Recipients handled per insert batch when a note is published.
    #[serde(default = "default_fanout_batch")]
    pub fanout_batch_size: i64,
    /// Maximum notifications returned by the listing endpoint.
    #[serde(default = "default_list_limit")]
    pub list_limit: i64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            fanout_batch_size: default_fanout_batch(),
            list_limit: default_list_limit(),
        }
    }
}

fn default_hub_path() -> String {
    "/notificationHub".to_string()
}

fn default_channel_buffer() -> usize {
    256
}

fn default_max_connections_per_user() -> usize {
    5
}

fn default_fanout_batch() -> i64 {
    500
}

fn default_list_limit() -> i64 {
    100
}
