//! Integration tests for notifications, preferences, and user search.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_mark_read_and_counts() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    for title in ["One", "Two"] {
        let note_id = app.create_note(&alice, title).await;
        app.request(
            "POST",
            &format!("/api/notes/{note_id}/share"),
            Some(json!({ "collaboratorId": bob.user_id })),
            Some(&alice),
        )
        .await;
    }

    let response = app
        .request("GET", "/api/notifications/unread-count", None, Some(&bob))
        .await;
    assert_eq!(response.body["count"], 2);

    let response = app.request("GET", "/api/notifications", None, Some(&bob)).await;
    let newest = response.body["data"][0]["id"].as_i64().unwrap();
    assert_eq!(response.body["data"][0]["message"], "alice shared a note with you: Two");

    // Only the recipient may mark a notification.
    let response = app
        .request("PUT", &format!("/api/notifications/{newest}/read"), None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Notification not found");

    let response = app
        .request("PUT", &format!("/api/notifications/{newest}/read"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["isRead"], true);

    let response = app
        .request("GET", "/api/notifications/unread-count", None, Some(&bob))
        .await;
    assert_eq!(response.body["count"], 1);

    let response = app
        .request("PUT", "/api/notifications/read-all", None, Some(&bob))
        .await;
    assert_eq!(response.body["message"], "All notifications marked as read");
    let response = app
        .request("GET", "/api/notifications/unread-count", None, Some(&bob))
        .await;
    assert_eq!(response.body["count"], 0);
}

#[tokio::test]
async fn test_preferences_default_then_update() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;

    let body = json!({
        "notifyOnPublic": false,
        "notifyOnShared": true,
        "emailNotifications": true,
    });
    let response = app
        .request("PUT", "/api/notification-preferences", Some(body.clone()), Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("GET", "/api/notification-preferences", None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["notifyOnPublic"], true);
    assert_eq!(response.body["notifyOnShared"], true);
    assert_eq!(response.body["emailNotifications"], false);

    let response = app
        .request("PUT", "/api/notification-preferences", Some(body), Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("GET", "/api/notification-preferences", None, Some(&alice))
        .await;
    assert_eq!(response.body["notifyOnPublic"], false);
    assert_eq!(response.body["emailNotifications"], true);
}

#[tokio::test]
async fn test_user_search() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    app.register("alfred").await;
    app.register("bob").await;

    let response = app
        .request("GET", "/api/users/search?term=AL", None, Some(&alice))
        .await;
    assert_eq!(response.body["users"].as_array().map(Vec::len), Some(2));

    let response = app
        .request("GET", "/api/users/search?term=", None, Some(&alice))
        .await;
    assert_eq!(response.body["users"].as_array().map(Vec::len), Some(0));

    let response = app.request("GET", "/api/users", None, Some(&alice)).await;
    assert_eq!(response.body["users"].as_array().map(Vec::len), Some(3));

    let response = app.request("GET", "/api/users/ping", None, None).await;
    assert_eq!(response.body["message"], "Users API is working");
}
