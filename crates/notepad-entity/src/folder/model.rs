//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notepad_core::types::{FolderId, UserId};

/// A folder in a user's drive. Folders nest through `parent_folder_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// The folder owner.
    pub owner_id: UserId,
    /// Parent folder ID (null for top-level folders).
    pub parent_folder_id: Option<FolderId>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a top-level folder.
    pub fn is_root(&self) -> bool {
        self.parent_folder_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// The folder owner.
    pub owner_id: UserId,
    /// Parent folder (None for top level).
    pub parent_folder_id: Option<FolderId>,
}
