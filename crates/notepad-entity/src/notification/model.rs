//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notepad_core::types::{NoteId, NotificationId, UserId};

use super::kind::NotificationType;

/// A notification addressed to one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// Human-readable text.
    pub message: String,
    /// What triggered the notification.
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// The note this notification refers to, if any.
    pub note_id: Option<NoteId>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// Whether the recipient has read it.
    pub is_read: bool,
}

impl Notification {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

/// Data required to create a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    /// Recipient.
    pub user_id: UserId,
    /// Human-readable text.
    pub message: String,
    /// What triggered it.
    pub notification_type: NotificationType,
    /// Related note.
    pub note_id: Option<NoteId>,
}

impl CreateNotification {
    /// Notification telling `recipient` that `owner` shared a note with them.
    pub fn note_shared(recipient: UserId, owner: &str, note_id: NoteId, title: &str) -> Self {
        Self {
            user_id: recipient,
            message: format!("{owner} shared a note with you: {title}"),
            notification_type: NotificationType::NoteShared,
            note_id: Some(note_id),
        }
    }

    /// Notification telling `recipient` that `owner` published a note.
    pub fn new_public_note(recipient: UserId, owner: &str, note_id: NoteId, title: &str) -> Self {
        Self {
            user_id: recipient,
            message: format!("{owner} shared a new public note: {title}"),
            notification_type: NotificationType::NewPublicNote,
            note_id: Some(note_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let shared = CreateNotification::note_shared(UserId(2), "alice", NoteId(9), "Plans");
        assert_eq!(shared.message, "alice shared a note with you: Plans");
        assert_eq!(shared.notification_type, NotificationType::NoteShared);

        let public = CreateNotification::new_public_note(UserId(3), "alice", NoteId(9), "Plans");
        assert_eq!(public.message, "alice shared a new public note: Plans");
        assert_eq!(public.note_id, Some(NoteId(9)));
    }

    #[test]
    fn test_type_field_renamed_on_the_wire() {
        let n = Notification {
            id: NotificationId(1),
            user_id: UserId(2),
            message: "m".to_string(),
            notification_type: NotificationType::NoteShared,
            note_id: None,
            created_at: Utc::now(),
            is_read: false,
        };
        let json = serde_json::to_value(&n).expect("serialize");
        assert_eq!(json["type"], "NoteShared");
        assert_eq!(json["isRead"], false);
        assert_eq!(json["userId"], 2);
    }
}
