//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use notepad_auth::{JwtDecoder, PasswordValidator, SessionTokenIssuer};
use notepad_core::config::AppConfig;
use notepad_database::{DatabasePool, Stores};
use notepad_realtime::NotificationHub;
use notepad_service::{
    AuthService, BlobStore, DriveService, NoteService, NotificationPusher, NotificationService,
    PreferenceService, UserService,
};

use crate::middleware::rate_limit::RateLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool, absent with the in-memory backend
    pub db: Option<DatabasePool>,
    /// Per-IP token buckets
    pub rate_limiter: RateLimiter,
    /// Notification hub
    pub hub: Arc<NotificationHub>,

    // ── Auth ─────────────────────────────────────────────────
    /// Informational JWT decoder, absent when no secret is configured
    pub jwt_decoder: Option<Arc<JwtDecoder>>,

    // ── Services ─────────────────────────────────────────────
    /// Registration, login, and token checks
    pub auth_service: Arc<AuthService>,
    /// Notes, shares, and publishing
    pub note_service: Arc<NoteService>,
    /// Notification listing and delivery
    pub notification_service: Arc<NotificationService>,
    /// Notification preferences
    pub preference_service: Arc<PreferenceService>,
    /// Folders and uploads
    pub drive_service: Arc<DriveService>,
    /// User search
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Wire every service on top of the given stores and blob store.
    pub fn new(
        config: AppConfig,
        stores: Stores,
        blobs: Arc<dyn BlobStore>,
        db: Option<DatabasePool>,
    ) -> Self {
        let hub = Arc::new(NotificationHub::new(config.realtime.clone()));
        let pusher: Arc<dyn NotificationPusher> = hub.clone();

        let notification_service = Arc::new(NotificationService::new(
            Arc::clone(&stores.notifications),
            pusher,
            config.notifications.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.tokens),
            PasswordValidator::new(&config.auth),
            SessionTokenIssuer::new(&config.auth),
        ));
        let note_service = Arc::new(NoteService::new(
            Arc::clone(&stores.notes),
            Arc::clone(&stores.shares),
            Arc::clone(&stores.users),
            Arc::clone(&notification_service),
        ));
        let preference_service = Arc::new(PreferenceService::new(Arc::clone(&stores.preferences)));
        let drive_service = Arc::new(DriveService::new(
            Arc::clone(&stores.folders),
            Arc::clone(&stores.files),
            blobs,
            config.drive.max_upload_bytes,
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&stores.users)));

        Self {
            rate_limiter: RateLimiter::new(&config.rate_limit),
            jwt_decoder: JwtDecoder::new(&config.auth).map(Arc::new),
            config: Arc::new(config),
            db,
            hub,
            auth_service,
            note_service,
            notification_service,
            preference_service,
            drive_service,
            user_service,
        }
    }
}
