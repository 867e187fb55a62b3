//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use notepad_api::{AppState, build_app};
use notepad_core::config::{AppConfig, DatabaseBackend};
use notepad_database::{MemoryDatabase, Stores};
use notepad_service::LocalBlobStore;

const BOUNDARY: &str = "notepad-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// In-process database behind the router
    pub db: Arc<MemoryDatabase>,
    /// Upload directory, removed on drop
    pub uploads: TempDir,
}

/// A registered user and their session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub token: String,
}

impl TestApp {
    /// Create a new test application with the default configuration.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after adjusting the configuration.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Memory;
        config.rate_limit.max_requests = 10_000;
        adjust(&mut config);

        let uploads = tempfile::tempdir().expect("Failed to create upload dir");
        let blobs = LocalBlobStore::new(uploads.path())
            .await
            .expect("Failed to init blob store");

        let db = Arc::new(MemoryDatabase::new());
        let state = AppState::new(
            config,
            Stores::from_memory(db.clone()),
            Arc::new(blobs),
            None,
        );

        Self {
            router: build_app(state),
            db,
            uploads,
        }
    }

    /// Register a user with a predictable email and password.
    pub async fn register(&self, username: &str) -> Session {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "secret123",
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "register failed: {}", response.body);
        Session {
            user_id: response.body["user"]["id"].as_i64().expect("user id"),
            token: response.body["token"]
                .as_str()
                .expect("token")
                .to_string(),
        }
    }

    /// Create a note owned by `session` and return its id.
    pub async fn create_note(&self, session: &Session, title: &str) -> i64 {
        let response = self
            .request(
                "POST",
                "/api/notes",
                Some(json!({ "title": title, "content": "body" })),
                Some(session),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["data"]["id"].as_i64().expect("note id")
    }

    /// Send a JSON request, authenticated as `session` when given.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        session: Option<&Session>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(session) = session {
            req = req
                .header("Authorization", format!("Bearer {}", session.token))
                .header("UserId", session.user_id.to_string());
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Upload `data` as the multipart `file` field.
    pub async fn upload(
        &self,
        session: &Session,
        folder_id: Option<i64>,
        file_name: &str,
        data: &[u8],
    ) -> TestResponse {
        let mut body = Vec::new();
        if let Some(folder_id) = folder_id {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"folderId\"\r\n\r\n{folder_id}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/drive/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("Authorization", format!("Bearer {}", session.token))
            .header("UserId", session.user_id.to_string())
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` array of a `{data: [...]}` envelope.
    pub fn data_len(&self) -> usize {
        self.body["data"].as_array().map(Vec::len).unwrap_or(0)
    }
}
