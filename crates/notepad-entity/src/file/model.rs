//! Drive file entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notepad_core::types::{FileId, FolderId, UserId};

/// Metadata of an uploaded file. The bytes live at `path` on disk.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// Unique file identifier.
    pub id: FileId,
    /// Original file name as uploaded.
    pub name: String,
    /// MIME type reported by the client.
    pub content_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Storage path of the blob.
    pub path: String,
    /// The uploader.
    pub owner_id: UserId,
    /// Containing folder (None for the drive root).
    pub folder_id: Option<FolderId>,
    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
    /// Whether the file is visible to other users.
    pub is_public: bool,
}

/// Data required to record a new upload.
#[derive(Debug, Clone)]
pub struct CreateDriveFile {
    /// Original file name.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Storage path of the blob.
    pub path: String,
    /// The uploader.
    pub owner_id: UserId,
    /// Containing folder.
    pub folder_id: Option<FolderId>,
}
