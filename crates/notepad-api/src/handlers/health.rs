//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let database = match &state.db {
        Some(db) => match db.ping().await {
            Ok(true) => "connected",
            _ => "unreachable",
        },
        None => "memory",
    };
    let status = if database == "unreachable" { "degraded" } else { "ok" };

    Json(DetailedHealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        hub_connections: state.hub.connection_count(),
        online_users: state.hub.online_user_count(),
    })
}
