//! Notification handlers.

use axum::Json;
use axum::extract::{Path, State};

use notepad_core::types::NotificationId;
use notepad_entity::notification::Notification;

use crate::dto::response::{CountResponse, DataResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = state.notification_service.list(&auth).await?;
    Ok(Json(DataResponse::new(notifications)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CountResponse>> {
    let count = state.notification_service.unread_count(&auth).await?;
    Ok(Json(CountResponse { count }))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NotificationId>,
) -> ApiResult<Json<DataResponse<Notification>>> {
    let notification = state.notification_service.mark_read(&auth, id).await?;
    Ok(Json(DataResponse::new(notification)))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MessageResponse>> {
    state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(MessageResponse::new("All notifications marked as read")))
}
