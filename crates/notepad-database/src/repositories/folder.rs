//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notepad_core::error::{AppError, ErrorKind};
use notepad_core::result::AppResult;
use notepad_core::types::{FolderId, UserId};
use notepad_entity::file::DriveFile;
use notepad_entity::folder::{CreateFolder, Folder};

use crate::store::FolderStore;

/// Repository for drive folders.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Selects the folder `$1` and every folder beneath it.
const SUBTREE_CTE: &str = "WITH RECURSIVE tree AS ( \
        SELECT id FROM folders WHERE id = $1 \
        UNION ALL \
        SELECT f.id FROM folders f INNER JOIN tree t ON f.parent_folder_id = t.id \
     )";

#[async_trait]
impl FolderStore for FolderRepository {
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name, owner_id, parent_folder_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.owner_id)
        .bind(data.parent_folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))
    }

    async fn find_owned(&self, id: FolderId, owner: UserId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE owner_id = $1 ORDER BY name ASC, id ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn delete_tree(&self, id: FolderId) -> AppResult<Vec<DriveFile>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let removed = sqlx::query_as::<_, DriveFile>(&format!(
            "{SUBTREE_CTE} DELETE FROM drive_files WHERE folder_id IN (SELECT id FROM tree) RETURNING *"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete folder files", e))?;

        // Deepest folders first so no row is removed while a child still references it.
        let ids: Vec<FolderId> = sqlx::query_scalar::<_, FolderId>(
            "WITH RECURSIVE tree AS ( \
                SELECT id, 0 AS depth FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.id, t.depth + 1 FROM folders f INNER JOIN tree t ON f.parent_folder_id = t.id \
             ) SELECT id FROM tree ORDER BY depth DESC",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to walk folder tree", e))?;

        for folder_id in ids {
            sqlx::query("DELETE FROM folders WHERE id = $1")
                .bind(folder_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
                })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder delete", e)
        })?;

        Ok(removed)
    }
}
