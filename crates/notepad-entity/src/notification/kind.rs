//! Notification type enumeration.

use serde::{Deserialize, Serialize};

/// Why a notification was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type")]
pub enum NotificationType {
    /// Another user published a note.
    NewPublicNote,
    /// A note was shared with the recipient.
    NoteShared,
}

impl NotificationType {
    /// Return the type as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewPublicNote => "NewPublicNote",
            Self::NoteShared => "NoteShared",
        }
    }
}
