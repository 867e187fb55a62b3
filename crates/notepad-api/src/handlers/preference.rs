//! Notification preference handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use notepad_entity::notification::{NotificationPreferences, UpdatePreferences};

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notification-preferences
pub async fn get_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<NotificationPreferences>> {
    Ok(Json(state.preference_service.get(&auth).await?))
}

/// PUT /api/notification-preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdatePreferences>,
) -> ApiResult<StatusCode> {
    state.preference_service.update(&auth, req).await?;
    Ok(StatusCode::NO_CONTENT)
}
