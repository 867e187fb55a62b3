//! Integration tests for folders and uploads.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{Session, TestApp};

async fn create_folder(app: &TestApp, session: &Session, name: &str, parent: Option<i64>) -> i64 {
    let response = app
        .request(
            "POST",
            "/api/drive/folders",
            Some(json!({ "name": name, "parentFolderId": parent })),
            Some(session),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    response.body["data"]["id"].as_i64().expect("folder id")
}

#[tokio::test]
async fn test_upload_into_folder_and_list() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let folder = create_folder(&app, &alice, "Docs", None).await;

    let response = app
        .upload(&alice, Some(folder), "notes.txt", b"hello drive")
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let file = &response.body["data"];
    assert_eq!(file["name"], "notes.txt");
    assert_eq!(file["size"], 11);
    assert_eq!(file["contentType"], "text/plain");

    let response = app.request("GET", "/api/drive/folders", None, Some(&alice)).await;
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data_len(), 1);
    assert_eq!(response.body["data"][0]["name"], "Docs");
    assert_eq!(response.body["data"][0]["files"].as_array().map(Vec::len), Some(1));

    let response = app
        .request("GET", &format!("/api/drive/folders/{folder}/files"), None, Some(&alice))
        .await;
    assert_eq!(response.data_len(), 1);

    let response = app
        .request("GET", "/api/drive/folders/root/files", None, Some(&alice))
        .await;
    assert_eq!(response.data_len(), 0);
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let bobs_folder = create_folder(&app, &bob, "Private", None).await;

    let response = app.upload(&alice, None, "empty.txt", b"").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "No file was uploaded");

    let response = app
        .upload(&alice, Some(bobs_folder), "sneaky.txt", b"data")
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "GET",
            &format!("/api/drive/folders/{bobs_folder}/files"),
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Folder not found or access denied");
}

#[tokio::test]
async fn test_delete_folder_spares_siblings() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let doomed = create_folder(&app, &alice, "Doomed", None).await;
    let nested = create_folder(&app, &alice, "Nested", Some(doomed)).await;
    let sibling = create_folder(&app, &alice, "Sibling", None).await;

    app.upload(&alice, Some(doomed), "a.txt", b"aaa").await;
    app.upload(&alice, Some(nested), "b.txt", b"bbb").await;
    app.upload(&alice, Some(sibling), "c.txt", b"ccc").await;
    app.upload(&alice, None, "d.txt", b"ddd").await;
    assert_eq!(app.db.file_count().await, 4);

    let response = app
        .request("DELETE", &format!("/api/drive/folders/{doomed}"), None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    assert_eq!(app.db.file_count().await, 2);
    assert_eq!(app.db.folder_count().await, 1);
    let response = app
        .request("GET", &format!("/api/drive/folders/{sibling}/files"), None, Some(&alice))
        .await;
    assert_eq!(response.data_len(), 1);
    let response = app
        .request("GET", "/api/drive/folders/root/files", None, Some(&alice))
        .await;
    assert_eq!(response.data_len(), 1);

    let response = app
        .request("DELETE", &format!("/api/drive/folders/{doomed}"), None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_file_requires_owner() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let response = app.upload(&alice, None, "mine.txt", b"mine").await;
    let file_id = response.body["data"]["id"].as_i64().unwrap();

    let response = app
        .request("DELETE", &format!("/api/drive/files/{file_id}"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Access denied");

    let response = app
        .request("DELETE", &format!("/api/drive/files/{file_id}"), None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("DELETE", &format!("/api/drive/files/{file_id}"), None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "File not found");
}

#[tokio::test]
async fn test_upload_with_overlong_name_is_truncated() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let long_name = format!("{}.txt", "a".repeat(240));

    let response = app.upload(&alice, None, &long_name, b"hello").await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let name = response.body["data"]["name"].as_str().unwrap();
    assert_eq!(name.len(), 200);
    assert!(name.ends_with(".txt"));
    assert_eq!(app.db.file_count().await, 1);
}
