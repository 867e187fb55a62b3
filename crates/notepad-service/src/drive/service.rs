//! Folder management and file uploads for `/api/drive`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use notepad_core::error::AppError;
use notepad_core::types::{FileId, FolderId};
use notepad_database::{FileStore, FolderStore};
use notepad_entity::file::{CreateDriveFile, DriveFile};
use notepad_entity::folder::{CreateFolder, Folder};

use crate::context::RequestContext;

use super::blob::{BlobStore, ByteStream};

const FOLDER_NOT_FOUND: &str = "Folder not found or access denied";

/// Longest stored file name, in bytes. Leaves room for the blob key prefix
/// under the usual 255-byte path component limit.
const MAX_FILE_NAME_BYTES: usize = 200;

/// Content type recorded when the client sends none.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A folder with the files directly inside it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderWithFiles {
    #[serde(flatten)]
    pub folder: Folder,
    pub files: Vec<DriveFile>,
}

/// One multipart upload.
pub struct UploadInput {
    /// Client-supplied file name, sanitized before use.
    pub file_name: String,
    pub content_type: Option<String>,
    pub folder_id: Option<FolderId>,
    pub body: ByteStream,
}

impl std::fmt::Debug for UploadInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadInput")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("folder_id", &self.folder_id)
            .finish()
    }
}

/// Implements folders and file uploads.
#[derive(Debug, Clone)]
pub struct DriveService {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    blobs: Arc<dyn BlobStore>,
    max_upload_bytes: u64,
}

impl DriveService {
    /// Creates a new drive service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            folders,
            files,
            blobs,
            max_upload_bytes,
        }
    }

    async fn owned_folder(&self, ctx: &RequestContext, id: FolderId) -> Result<Folder, AppError> {
        self.folders
            .find_owned(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(FOLDER_NOT_FOUND))
    }

    /// Create a folder, optionally under an owned parent.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent: Option<FolderId>,
    ) -> Result<Folder, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name is required"));
        }
        if let Some(parent) = parent {
            self.owned_folder(ctx, parent).await?;
        }
        let folder = self
            .folders
            .create(&CreateFolder {
                name: name.to_string(),
                owner_id: ctx.user_id,
                parent_folder_id: parent,
            })
            .await?;
        info!(user_id = %ctx.user_id, folder_id = %folder.id, "Folder created");
        Ok(folder)
    }

    /// The caller's folders ordered by name, each with its files.
    pub async fn list_folders(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<FolderWithFiles>, AppError> {
        let folders = self.folders.list_by_owner(ctx.user_id).await?;
        let mut by_folder: HashMap<FolderId, Vec<DriveFile>> = HashMap::new();
        for file in self.files.list_in_folders(ctx.user_id).await? {
            if let Some(folder_id) = file.folder_id {
                by_folder.entry(folder_id).or_default().push(file);
            }
        }
        Ok(folders
            .into_iter()
            .map(|folder| FolderWithFiles {
                files: by_folder.remove(&folder.id).unwrap_or_default(),
                folder,
            })
            .collect())
    }

    /// Files the caller uploaded outside any folder.
    pub async fn root_files(&self, ctx: &RequestContext) -> Result<Vec<DriveFile>, AppError> {
        self.files.list_in_folder(ctx.user_id, None).await
    }

    /// Files directly inside an owned folder.
    pub async fn folder_files(
        &self,
        ctx: &RequestContext,
        id: FolderId,
    ) -> Result<Vec<DriveFile>, AppError> {
        self.owned_folder(ctx, id).await?;
        self.files.list_in_folder(ctx.user_id, Some(id)).await
    }

    /// Delete an owned folder with everything beneath it.
    pub async fn delete_folder(&self, ctx: &RequestContext, id: FolderId) -> Result<(), AppError> {
        self.owned_folder(ctx, id).await?;
        let removed = self.folders.delete_tree(id).await?;
        for file in &removed {
            self.remove_blob(file).await;
        }
        info!(
            user_id = %ctx.user_id,
            folder_id = %id,
            files = removed.len(),
            "Folder deleted"
        );
        Ok(())
    }

    /// Store an upload and record it.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        input: UploadInput,
    ) -> Result<DriveFile, AppError> {
        if let Some(folder) = input.folder_id {
            self.owned_folder(ctx, folder).await?;
        }

        let name = sanitize_file_name(&input.file_name);
        let key = format!("{}_{}", Uuid::new_v4(), name);
        let blob = self
            .blobs
            .put(&key, input.body, self.max_upload_bytes)
            .await?;
        if blob.size == 0 {
            self.blobs.remove(&blob.path).await?;
            return Err(AppError::validation("No file was uploaded"));
        }

        let size = i64::try_from(blob.size)
            .map_err(|_| AppError::validation("File is too large"))?;
        let created = self
            .files
            .create(&CreateDriveFile {
                name,
                content_type: input
                    .content_type
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
                size,
                path: blob.path.clone(),
                owner_id: ctx.user_id,
                folder_id: input.folder_id,
            })
            .await;

        match created {
            Ok(file) => {
                info!(user_id = %ctx.user_id, file_id = %file.id, size, "File uploaded");
                Ok(file)
            }
            Err(e) => {
                self.discard_blob(&blob.path).await;
                Err(e)
            }
        }
    }

    /// Delete a file the caller owns.
    pub async fn delete_file(&self, ctx: &RequestContext, id: FileId) -> Result<(), AppError> {
        let file = self
            .files
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if file.owner_id != ctx.user_id {
            warn!(user_id = %ctx.user_id, file_id = %id, "Non-owner attempted to delete file");
            return Err(AppError::authentication("Access denied"));
        }
        self.remove_blob(&file).await;
        self.files.delete(id).await?;
        info!(user_id = %ctx.user_id, file_id = %id, "File deleted");
        Ok(())
    }

    async fn remove_blob(&self, file: &DriveFile) {
        if let Err(e) = self.blobs.remove(&file.path).await {
            warn!(file_id = %file.id, path = %file.path, error = %e, "Failed to remove blob");
        }
    }

    /// Drop a blob whose row was never recorded.
    async fn discard_blob(&self, path: &str) {
        if let Err(e) = self.blobs.remove(path).await {
            warn!(path = %path, error = %e, "Failed to remove orphaned blob");
        }
    }
}

/// Strip directories and unsafe characters from a client file name.
fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        truncate_file_name(cleaned, MAX_FILE_NAME_BYTES)
    }
}

/// Cut `name` to at most `max` bytes on a char boundary, keeping a short
/// extension intact.
fn truncate_file_name(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }
    let ext = name
        .rfind('.')
        .map(|dot| &name[dot..])
        .filter(|ext| ext.len() <= max / 4)
        .unwrap_or("");
    let stem = &name[..name.len() - ext.len()];
    let mut cut = max - ext.len();
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", stem[..cut].trim_end(), ext)
}
