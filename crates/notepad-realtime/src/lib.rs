//! # notepad-realtime
//!
//! The notification hub behind `/notificationHub`. Every authenticated
//! connection joins the group `User_{id}` of its own user, and stored
//! notifications are pushed to that group as they are created.
//!
//! The socket I/O lives in the API crate. This crate owns the connection
//! registry, the group membership index, and the JSON frames.

pub mod connection;
pub mod group;
pub mod hub;
pub mod message;

pub use connection::{ConnectionHandle, ConnectionId, ConnectionPool};
pub use group::{GroupRegistry, user_group};
pub use hub::NotificationHub;
pub use message::{InboundMessage, OutboundMessage};
