//! Integration tests for notes, sharing, and publishing.

use axum::http::StatusCode;
use serde_json::json;

use notepad_core::types::NoteId;
use notepad_database::{NotificationStore, ShareStore};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_create_and_update_note() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;

    let response = app
        .request(
            "POST",
            "/api/notes",
            Some(json!({ "title": "Plan", "content": "first", "category": "work" })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let note = &response.body["data"];
    assert_eq!(note["status"], "Personal");
    assert_eq!(note["isPublic"], false);
    assert_eq!(note["owner"], "alice");
    let id = note["id"].as_i64().unwrap();

    // Empty fields are left unchanged.
    let response = app
        .request(
            "PUT",
            &format!("/api/notes/{id}"),
            Some(json!({ "title": "", "content": "second" })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["title"], "Plan");
    assert_eq!(response.body["data"]["content"], "second");

    let response = app.request("GET", "/api/notes", None, Some(&alice)).await;
    assert_eq!(response.data_len(), 1);

    let response = app
        .request("PUT", "/api/notes/99999", Some(json!({ "title": "x" })), Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Note not found");
}

#[tokio::test]
async fn test_share_twice_creates_one_share_and_one_notification() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let note_id = app.create_note(&alice, "Plan").await;

    for _ in 0..2 {
        let response = app
            .request(
                "POST",
                &format!("/api/notes/{note_id}/share"),
                Some(json!({ "collaboratorId": bob.user_id })),
                Some(&alice),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["message"], "Note shared successfully");
        assert_eq!(response.body["noteId"].as_i64(), Some(note_id));
        assert_eq!(response.body["sharedWithUserId"].as_i64(), Some(bob.user_id));
    }

    let note = NoteId(note_id as i32);
    assert_eq!(ShareStore::count_for_note(&*app.db, note).await.unwrap(), 1);
    assert_eq!(
        NotificationStore::count_for_note(&*app.db, note).await.unwrap(),
        1
    );

    let response = app.request("GET", "/api/notifications", None, Some(&bob)).await;
    assert_eq!(response.data_len(), 1);
    let notification = &response.body["data"][0];
    assert_eq!(notification["type"], "NoteShared");
    assert_eq!(notification["message"], "alice shared a note with you: Plan");

    let response = app.request("GET", "/api/notes/shared", None, Some(&bob)).await;
    assert_eq!(response.data_len(), 1);
    assert_eq!(response.body["data"][0]["status"], "Shared");
}

#[tokio::test]
async fn test_share_errors() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let note_id = app.create_note(&alice, "Plan").await;

    let share = |collaborator: i64| json!({ "collaboratorId": collaborator });

    let response = app
        .request(
            "POST",
            &format!("/api/notes/{note_id}/share"),
            Some(share(alice.user_id)),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "POST",
            &format!("/api/notes/{note_id}/share"),
            Some(share(99_999)),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "User not found");

    let response = app
        .request(
            "POST",
            &format!("/api/notes/{note_id}/share"),
            Some(share(alice.user_id)),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            &format!("/api/notes/{note_id}/share-with/{}", bob.user_id),
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Note shared successfully");
}

#[tokio::test]
async fn test_make_public_sets_both_flags_and_fans_out_once() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let carol = app.register("carol").await;
    let note_id = app.create_note(&alice, "Launch").await;

    for _ in 0..2 {
        let response = app
            .request(
                "PUT",
                &format!("/api/notes/{note_id}/make-public"),
                None,
                Some(&alice),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"]["isPublic"], true);
        assert_eq!(response.body["data"]["status"], "Public");
    }

    for session in [&bob, &carol] {
        let response = app
            .request("GET", "/api/notifications", None, Some(session))
            .await;
        assert_eq!(response.data_len(), 1);
        assert_eq!(
            response.body["data"][0]["message"],
            "alice shared a new public note: Launch"
        );
    }
    let response = app
        .request("GET", "/api/notifications", None, Some(&alice))
        .await;
    assert_eq!(response.data_len(), 0);

    let response = app.request("GET", "/api/notes/public", None, Some(&bob)).await;
    assert_eq!(response.data_len(), 1);
    assert_eq!(
        response.headers["cache-control"],
        "no-cache, no-store, must-revalidate"
    );
    assert_eq!(response.headers["pragma"], "no-cache");

    let response = app
        .request(
            "PUT",
            &format!("/api/notes/{note_id}/make-public"),
            None,
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_status_body_is_a_bare_string() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let note_id = app.create_note(&alice, "Draft").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/notes/{note_id}/status"),
            Some(json!("Public")),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["isPublic"], true);

    let response = app
        .request(
            "PUT",
            &format!("/api/notes/{note_id}/status"),
            Some(json!("Personal")),
            Some(&alice),
        )
        .await;
    assert_eq!(response.body["data"]["status"], "Personal");
    assert_eq!(response.body["data"]["isPublic"], false);
}

#[tokio::test]
async fn test_delete_note_removes_shares_and_notifications() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let note_id = app.create_note(&alice, "Plan").await;
    app.request(
        "POST",
        &format!("/api/notes/{note_id}/share"),
        Some(json!({ "collaboratorId": bob.user_id })),
        Some(&alice),
    )
    .await;

    let response = app
        .request("DELETE", &format!("/api/notes/{note_id}"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Only the note owner can delete it");

    let response = app
        .request("DELETE", &format!("/api/notes/{note_id}"), None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Note deleted successfully");

    let note = NoteId(note_id as i32);
    assert_eq!(ShareStore::count_for_note(&*app.db, note).await.unwrap(), 0);
    assert_eq!(
        NotificationStore::count_for_note(&*app.db, note).await.unwrap(),
        0
    );
    let response = app.request("GET", "/api/notifications", None, Some(&bob)).await;
    assert_eq!(response.data_len(), 0);

    let response = app.request("GET", "/api/notes/stats", None, Some(&alice)).await;
    assert_eq!(response.body["totalNotes"], 0);
    assert_eq!(response.body["noteShares"], 0);
    assert_eq!(response.body["users"], 2);
}
