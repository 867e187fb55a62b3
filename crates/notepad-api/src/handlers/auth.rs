//! Auth handlers: register and login.

use axum::Json;
use axum::extract::State;

use notepad_service::{AuthSession, RegisterInput};

use crate::dto::request::{LoginRequest, RegisterRequest, validate};
use crate::error::ApiResult;
use crate::extractors::ClientIp;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthSession>> {
    validate(&req)?;
    let session = state
        .auth_service
        .register(RegisterInput {
            username: req.username,
            email: req.email,
            password: req.password,
            name: req.name,
        })
        .await?;
    Ok(Json(session))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthSession>> {
    validate(&req)?;
    let session = state
        .auth_service
        .login(&req.username, &req.password, &ip)
        .await?;
    Ok(Json(session))
}
