//! Note handlers: CRUD, sharing, publishing, and stats.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::Value;

use notepad_core::error::AppError;
use notepad_core::types::{NoteId, UserId};
use notepad_database::NoteStats;
use notepad_entity::note::NoteStatus;
use notepad_service::{FormattedNote, NoteUpdate, ShareOutcome};

use crate::dto::request::{CreateNoteRequest, ShareNoteRequest, UpdateNoteRequest, validate};
use crate::dto::response::{DataResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

type NoteResponse = Json<DataResponse<FormattedNote>>;
type NotesResponse = Json<DataResponse<Vec<FormattedNote>>>;

/// Share confirmation body.
#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub outcome: ShareOutcome,
}

/// GET /api/notes
pub async fn list_notes(State(state): State<AppState>, auth: AuthUser) -> ApiResult<NotesResponse> {
    let notes = state.note_service.list_mine(&auth).await?;
    Ok(Json(DataResponse::new(notes)))
}

/// POST /api/notes
pub async fn create_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateNoteRequest>,
) -> ApiResult<(StatusCode, NoteResponse)> {
    validate(&req)?;
    let note = state
        .note_service
        .create(&auth, req.title, req.content, req.category)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(note))))
}

/// PUT /api/notes/{id}
pub async fn update_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoteId>,
    Json(req): Json<UpdateNoteRequest>,
) -> ApiResult<NoteResponse> {
    validate(&req)?;
    let note = state
        .note_service
        .update(
            &auth,
            id,
            NoteUpdate {
                title: req.title,
                content: req.content,
                category: req.category,
            },
        )
        .await?;
    Ok(Json(DataResponse::new(note)))
}

/// DELETE /api/notes/{id}
pub async fn delete_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoteId>,
) -> ApiResult<Json<MessageResponse>> {
    state.note_service.delete(&auth, id).await?;
    Ok(Json(MessageResponse::new("Note deleted successfully")))
}

/// POST /api/notes/{id}/share
pub async fn share_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoteId>,
    Json(req): Json<ShareNoteRequest>,
) -> ApiResult<Json<ShareResponse>> {
    let outcome = state
        .note_service
        .share(&auth, id, req.collaborator_id)
        .await?;
    Ok(Json(ShareResponse {
        message: "Note shared successfully",
        outcome,
    }))
}

/// POST /api/notes/{noteId}/share-with/{userId}
pub async fn share_note_with(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, user_id)): Path<(NoteId, UserId)>,
) -> ApiResult<Json<MessageResponse>> {
    state.note_service.share(&auth, id, user_id).await?;
    Ok(Json(MessageResponse::new("Note shared successfully")))
}

/// GET /api/notes/shared
pub async fn shared_notes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<NotesResponse> {
    let notes = state.note_service.list_shared_with_me(&auth).await?;
    Ok(Json(DataResponse::new(notes)))
}

/// PUT /api/notes/{id}/make-public
pub async fn make_public(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoteId>,
) -> ApiResult<NoteResponse> {
    let note = state.note_service.make_public(&auth, id).await?;
    Ok(Json(DataResponse::new(note)))
}

/// GET /api/notes/public
pub async fn public_notes(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let notes = state.note_service.list_public().await?;
    Ok((
        [
            (CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (PRAGMA, "no-cache"),
            (EXPIRES, "0"),
        ],
        Json(DataResponse::new(notes)),
    ))
}

/// PUT /api/notes/{id}/status
///
/// The body is a bare JSON value: a status name or its ordinal.
pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoteId>,
    Json(body): Json<Value>,
) -> ApiResult<NoteResponse> {
    let status = parse_status(&body)?;
    let note = state.note_service.set_status(&auth, id, status).await?;
    Ok(Json(DataResponse::new(note)))
}

fn parse_status(body: &Value) -> Result<NoteStatus, AppError> {
    match body {
        Value::String(s) => s.parse::<NoteStatus>().map_err(AppError::validation),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Ok(NoteStatus::Personal),
            Some(1) => Ok(NoteStatus::Shared),
            Some(2) => Ok(NoteStatus::Public),
            _ => Err(AppError::validation(format!("Unknown note status: {n}"))),
        },
        _ => Err(AppError::validation("Status must be a string")),
    }
}

/// GET /api/notes/stats
pub async fn stats(State(state): State<AppState>, _auth: AuthUser) -> ApiResult<Json<NoteStats>> {
    Ok(Json(state.note_service.stats().await?))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_status_accepts_name_or_ordinal() {
        assert_eq!(parse_status(&json!("Public")).unwrap(), NoteStatus::Public);
        assert_eq!(parse_status(&json!("shared")).unwrap(), NoteStatus::Shared);
        assert_eq!(parse_status(&json!(0)).unwrap(), NoteStatus::Personal);
        assert!(parse_status(&json!(7)).is_err());
        assert!(parse_status(&json!({"status": "Public"})).is_err());
    }
}
