//! Drive handlers: folders, uploads, and file deletion.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use bytes::Bytes;
use futures::stream;

use notepad_core::error::AppError;
use notepad_core::types::{FileId, FolderId};
use notepad_entity::file::DriveFile;
use notepad_entity::folder::Folder;
use notepad_service::{FolderWithFiles, UploadInput};

use crate::dto::request::{CreateFolderRequest, validate};
use crate::dto::response::{ApiResponse, DataResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/drive/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> ApiResult<Json<DataResponse<Folder>>> {
    validate(&req)?;
    let folder = state
        .drive_service
        .create_folder(&auth, &req.name, req.parent_folder_id)
        .await?;
    Ok(Json(DataResponse::new(folder)))
}

/// GET /api/drive/folders
pub async fn list_folders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<FolderWithFiles>>>> {
    let folders = state.drive_service.list_folders(&auth).await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// GET /api/drive/folders/root/files
pub async fn root_files(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DataResponse<Vec<DriveFile>>>> {
    let files = state.drive_service.root_files(&auth).await?;
    Ok(Json(DataResponse::new(files)))
}

/// GET /api/drive/folders/{id}/files
pub async fn folder_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
) -> ApiResult<Json<DataResponse<Vec<DriveFile>>>> {
    let files = state.drive_service.folder_files(&auth, id).await?;
    Ok(Json(DataResponse::new(files)))
}

/// DELETE /api/drive/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
) -> ApiResult<StatusCode> {
    state.drive_service.delete_folder(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/drive/upload: multipart with `file` and optional `folderId`.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<DataResponse<DriveFile>>> {
    let mut folder_id: Option<FolderId> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "folderId" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                let text = text.trim();
                if !text.is_empty() && text != "null" {
                    folder_id = Some(
                        text.parse()
                            .map_err(|_| AppError::validation("Invalid folderId"))?,
                    );
                }
            }
            "file" => {
                file_name = field.file_name().map(String::from);
                content_type = field.content_type().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let data = data
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::validation("No file was uploaded"))?;

    let file = state
        .drive_service
        .upload(
            &auth,
            UploadInput {
                file_name: file_name.unwrap_or_default(),
                content_type,
                folder_id,
                body: Box::pin(stream::once(async move { Ok::<_, std::io::Error>(data) })),
            },
        )
        .await?;
    Ok(Json(DataResponse::new(file)))
}

/// DELETE /api/drive/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FileId>,
) -> ApiResult<StatusCode> {
    state.drive_service.delete_file(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
