//! User lookup handlers.

use axum::Json;
use axum::extract::{Query, State};

use crate::dto::request::UserSearchQuery;
use crate::dto::response::{MessageResponse, UsersResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/search?term=
pub async fn search_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<UserSearchQuery>,
) -> ApiResult<Json<UsersResponse>> {
    let users = state.user_service.search(&query.term).await?;
    Ok(Json(UsersResponse { users }))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<UsersResponse>> {
    let users = state.user_service.list_all().await?;
    Ok(Json(UsersResponse { users }))
}

/// GET /api/users/ping
pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse::new("Users API is working"))
}
