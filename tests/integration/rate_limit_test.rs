//! Integration tests for the per-IP request budget.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_admits_max_requests_then_429() {
    let app = TestApp::with_config(|config| {
        config.rate_limit.max_requests = 3;
        config.rate_limit.window_ms = 60_000;
    })
    .await;

    for _ in 0..3 {
        let response = app.request("GET", "/api/health", None, None).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body["message"], "Rate limit exceeded");
}

#[tokio::test]
async fn test_disabled_limiter_admits_everything() {
    let app = TestApp::with_config(|config| {
        config.rate_limit.enabled = false;
        config.rate_limit.max_requests = 1;
    })
    .await;

    for _ in 0..5 {
        let response = app.request("GET", "/api/health", None, None).await;
        assert_eq!(response.status, StatusCode::OK);
    }
}
