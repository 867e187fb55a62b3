//! `AuthUser` extractor: checks the bearer token against the `UserId` header.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{Extensions, HeaderMap};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use notepad_core::error::AppError;
use notepad_core::types::UserId;
use notepad_service::RequestContext;

use crate::error::ApiError;
use crate::middleware::rate_limit::UNKNOWN_CLIENT;
use crate::state::AppState;

/// Header carrying the caller's numeric user id.
pub const USER_ID_HEADER: &str = "userid";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Raw credentials presented by a client.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
    pub user_id: UserId,
}

/// Read the bearer token and user id from request headers.
pub fn credentials_from_headers(headers: &HeaderMap) -> Result<Credentials, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<UserId>().ok())
        .ok_or_else(|| AppError::authentication("Invalid user ID"))?;

    Ok(Credentials {
        token: token.to_string(),
        user_id,
    })
}

/// Peer IP recorded by `ConnectInfo`, or "unknown".
pub fn peer_ip(extensions: &Extensions) -> String {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Peer IP of the request, for handlers that do not require authentication.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(peer_ip(&parts.extensions)))
    }
}

/// Validate credentials and build the request principal.
pub async fn authenticate(
    state: &AppState,
    credentials: &Credentials,
    ip_address: String,
) -> Result<AuthUser, AppError> {
    let ctx = RequestContext::new(credentials.user_id, ip_address);
    state
        .auth_service
        .authenticate(&credentials.token, ctx.user_id, ctx.request_time)
        .await?;
    Ok(AuthUser(ctx))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credentials = credentials_from_headers(&parts.headers)?;
        let user = authenticate(state, &credentials, peer_ip(&parts.extensions)).await?;
        Ok(user)
    }
}
