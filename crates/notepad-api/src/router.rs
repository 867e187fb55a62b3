//! Route definitions for the Notepad Plus HTTP API.
//!
//! REST routes are mounted under `/api`; the notification hub sits at the
//! configured hub path.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the route table. Middleware is added by [`crate::app::build_app`].
pub fn build_router(state: &AppState) -> Router<AppState> {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(note_routes())
        .merge(notification_routes())
        .merge(preference_routes())
        .merge(drive_routes(state.config.drive.max_upload_bytes))
        .merge(user_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).route(
        &state.config.realtime.hub_path,
        get(handlers::hub::hub_upgrade),
    )
}

/// Registration and login, exempt from the token check
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
}

/// Notes, sharing, and publishing
fn note_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notes",
            get(handlers::note::list_notes).post(handlers::note::create_note),
        )
        .route("/notes/shared", get(handlers::note::shared_notes))
        .route("/notes/public", get(handlers::note::public_notes))
        .route("/notes/stats", get(handlers::note::stats))
        .route(
            "/notes/{id}",
            put(handlers::note::update_note).delete(handlers::note::delete_note),
        )
        .route("/notes/{id}/share", post(handlers::note::share_note))
        .route(
            "/notes/{id}/share-with/{user_id}",
            post(handlers::note::share_note_with),
        )
        .route("/notes/{id}/make-public", put(handlers::note::make_public))
        .route("/notes/{id}/status", put(handlers::note::set_status))
}

/// The caller's notifications
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
}

/// Notification preferences
fn preference_routes() -> Router<AppState> {
    Router::new().route(
        "/notification-preferences",
        get(handlers::preference::get_preferences).put(handlers::preference::update_preferences),
    )
}

/// Folders and files. Uploads get their own body limit.
fn drive_routes(max_upload_bytes: u64) -> Router<AppState> {
    let upload_limit = usize::try_from(max_upload_bytes).unwrap_or(usize::MAX);
    Router::new()
        .route(
            "/drive/folders",
            get(handlers::drive::list_folders).post(handlers::drive::create_folder),
        )
        .route("/drive/folders/root/files", get(handlers::drive::root_files))
        .route("/drive/folders/{id}/files", get(handlers::drive::folder_files))
        .route("/drive/folders/{id}", delete(handlers::drive::delete_folder))
        .route(
            "/drive/upload",
            post(handlers::drive::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/drive/files/{id}", delete(handlers::drive::delete_file))
}

/// User lookup
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/search", get(handlers::user::search_users))
        .route("/users/ping", get(handlers::user::ping))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
