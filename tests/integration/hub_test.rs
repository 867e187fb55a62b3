//! Integration tests for the notification hub upgrade route.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_hub_rejects_missing_credentials() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/notificationHub", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Missing Authorization header");
}

#[tokio::test]
async fn test_hub_rejects_bad_query_token() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;

    let path = format!(
        "/notificationHub?access_token=not-a-token&userId={}",
        alice.user_id
    );
    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid or expired token");

    // A real token for a different user id is refused too.
    let bob = app.register("bob").await;
    let path = format!(
        "/notificationHub?access_token={}&userId={}",
        bob.token, alice.user_id
    );
    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_hub_requires_upgrade_after_authenticating() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;

    let response = app.request("GET", "/notificationHub", None, Some(&alice)).await;
    assert!(response.status.is_client_error());
    assert_ne!(response.status, StatusCode::UNAUTHORIZED);
}
