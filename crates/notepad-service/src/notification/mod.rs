//! Notification storage, listing, and delivery.

pub mod pusher;
pub mod service;

pub use pusher::{NoopPusher, NotificationPusher};
pub use service::NotificationService;
