//! Drive file repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notepad_core::error::{AppError, ErrorKind};
use notepad_core::result::AppResult;
use notepad_core::types::{FileId, FolderId, UserId};
use notepad_entity::file::{CreateDriveFile, DriveFile};

use crate::store::FileStore;

/// Repository for uploaded file metadata.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn create(&self, data: &CreateDriveFile) -> AppResult<DriveFile> {
        sqlx::query_as::<_, DriveFile>(
            "INSERT INTO drive_files (name, content_type, size, path, owner_id, folder_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.content_type)
        .bind(data.size)
        .bind(&data.path)
        .bind(data.owner_id)
        .bind(data.folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    async fn find_by_id(&self, id: FileId) -> AppResult<Option<DriveFile>> {
        sqlx::query_as::<_, DriveFile>("SELECT * FROM drive_files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn list_in_folder(
        &self,
        owner: UserId,
        folder: Option<FolderId>,
    ) -> AppResult<Vec<DriveFile>> {
        sqlx::query_as::<_, DriveFile>(
            "SELECT * FROM drive_files WHERE owner_id = $1 AND folder_id IS NOT DISTINCT FROM $2 \
             ORDER BY uploaded_at DESC, id DESC",
        )
        .bind(owner)
        .bind(folder)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn list_in_folders(&self, owner: UserId) -> AppResult<Vec<DriveFile>> {
        sqlx::query_as::<_, DriveFile>(
            "SELECT * FROM drive_files WHERE owner_id = $1 AND folder_id IS NOT NULL \
             ORDER BY uploaded_at DESC, id DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folder files", e))
    }

    async fn delete(&self, id: FileId) -> AppResult<bool> {
        sqlx::query("DELETE FROM drive_files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))
    }
}
