//! Notification domain entities.

pub mod kind;
pub mod model;
pub mod preference;

pub use kind::NotificationType;
pub use model::{CreateNotification, Notification};
pub use preference::{NotificationPreferences, UpdatePreferences};
