//! Integration tests for registration, login, and the token check.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use crate::helpers::{Session, TestApp};

#[tokio::test]
async fn test_register_then_login_by_email() {
    let app = TestApp::new().await;
    let session = app.register("alice").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "alice@example.com", "password": "secret123" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["id"].as_i64(), Some(session.user_id));
    assert_eq!(response.body["user"]["username"], "alice");
    assert!(response.body["user"].get("passwordHash").is_none());
    assert_ne!(response.body["token"].as_str(), Some(session.token.as_str()));
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new().await;
    app.register("bob").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "bob", "password": "wrong-password" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid username/email or password");
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::new().await;
    app.register("carol").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "carol",
                "email": "other@example.com",
                "password": "secret123",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Username already exists");
}

#[tokio::test]
async fn test_protected_route_header_checks() {
    let app = TestApp::new().await;
    let session = app.register("dave").await;

    let response = app.request("GET", "/api/notes", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Missing Authorization header");

    // A valid token presented for another user id is rejected.
    let forged = Session {
        user_id: session.user_id + 1000,
        token: session.token.clone(),
    };
    let response = app.request("GET", "/api/notes", None, Some(&forged)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid or expired token");

    let response = app.request("GET", "/api/notes", None, Some(&session)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new().await;
    let session = app.register("erin").await;

    assert!(
        app.db
            .set_token_expiry(&session.token, Utc::now() - Duration::seconds(1))
            .await
    );

    let response = app.request("GET", "/api/notes", None, Some(&session)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_security_headers_and_health() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.headers["x-frame-options"], "DENY");
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert!(response.headers.contains_key("content-security-policy"));

    let response = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(response.body["database"], "memory");
    assert_eq!(response.body["hubConnections"], 0);
}

#[tokio::test]
async fn test_register_name_length_and_default() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "frank",
                "email": "frank@example.com",
                "password": "secret123",
                "name": "n".repeat(101),
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Name must be at most 100 characters");

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "frank",
                "email": "frank@example.com",
                "password": "secret123",
                "name": "Frank Ocean",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["name"], "Frank Ocean");

    // Omitted names are stored empty.
    let session = app.register("grace").await;
    let response = app.request("GET", "/api/users", None, Some(&session)).await;
    let grace = response.body["users"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == "grace")
        .cloned()
        .unwrap();
    assert_eq!(grace["name"], "");
}
