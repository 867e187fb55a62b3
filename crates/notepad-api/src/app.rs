//! Application builder: wires router, middleware, and state into an Axum app.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::jwt::decode_jwt;
use crate::middleware::logging::request_logging;
use crate::middleware::rate_limit::rate_limit;
use crate::middleware::security_headers::security_headers;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
///
/// Layers listed first wrap the ones after them.
pub fn build_app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(from_fn(security_headers))
        .layer(from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(state.rate_limiter.clone(), rate_limit))
        .layer(from_fn_with_state(state.clone(), decode_jwt))
        .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
        .layer(CompressionLayer::new());

    build_router(&state).layer(middleware).with_state(state)
}
