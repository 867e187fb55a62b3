//! Notification hub upgrade handler.

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use notepad_core::error::AppError;
use notepad_core::types::UserId;

use crate::dto::request::HubQuery;
use crate::error::ApiResult;
use crate::extractors::auth::{
    AuthUser, Credentials, USER_ID_HEADER, authenticate, credentials_from_headers,
};
use crate::extractors::ClientIp;
use crate::state::AppState;

/// Resolve hub credentials from headers, falling back to query parameters.
fn hub_credentials(headers: &HeaderMap, query: &HubQuery) -> Result<Credentials, AppError> {
    if headers.contains_key(AUTHORIZATION) {
        return credentials_from_headers(headers);
    }

    let token = query
        .access_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;
    let user_id = query
        .user_id
        .as_deref()
        .or_else(|| headers.get(USER_ID_HEADER).and_then(|v| v.to_str().ok()))
        .and_then(|v| v.trim().parse::<UserId>().ok())
        .ok_or_else(|| AppError::authentication("Invalid user ID"))?;

    Ok(Credentials {
        token: token.to_string(),
        user_id,
    })
}

/// GET /notificationHub: authenticate, then upgrade. Credentials are
/// checked before the upgrade headers.
pub async fn hub_upgrade(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    Query(query): Query<HubQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> ApiResult<Response> {
    let credentials = hub_credentials(&headers, &query)?;
    let AuthUser(ctx) = authenticate(&state, &credentials, ip).await?;
    let user_id = ctx.user_id;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            debug!(user_id = %user_id, "Hub request without a WebSocket upgrade");
            return Ok(rejection.into_response());
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_hub_connection(state, user_id, socket)))
}

/// Drives an established hub socket until either side closes.
async fn handle_hub_connection(state: AppState, user_id: UserId, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (conn_id, mut outbound_rx) = state.hub.register(user_id);

    // Spawn outbound frame forwarder. It ends when the hub drops the
    // connection, including eviction by a newer one.
    let mut outbound_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.send(Message::Close(None)).await;
    });

    // Process inbound frames
    let hub = state.hub.clone();
    let mut inbound_task = tokio::spawn(async move {
        while let Some(result) = ws_rx.next().await {
            match result {
                Ok(Message::Text(text)) => hub.handle_inbound(conn_id, text.as_str()),
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(conn_id = %conn_id, error = %e, "Hub socket error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut outbound_task => {
            debug!(conn_id = %conn_id, "Hub outbound closed");
            inbound_task.abort();
        }
        _ = &mut inbound_task => {
            outbound_task.abort();
        }
    }

    // Cleanup
    state.hub.unregister(conn_id);
    info!(conn_id = %conn_id, user_id = %user_id, "Hub socket closed");
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_query_credentials_fallback() {
        let query = HubQuery {
            access_token: Some("tok".to_string()),
            user_id: Some("3".to_string()),
        };
        let creds = hub_credentials(&HeaderMap::new(), &query).unwrap();
        assert_eq!(creds.token, "tok");
        assert_eq!(creds.user_id, UserId(3));

        let err = hub_credentials(&HeaderMap::new(), &HubQuery::default()).unwrap_err();
        assert_eq!(err.message, "Missing Authorization header");
    }

    #[test]
    fn test_header_credentials_win() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer head"));
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("8"));
        let query = HubQuery {
            access_token: Some("query".to_string()),
            user_id: Some("3".to_string()),
        };
        let creds = hub_credentials(&headers, &query).unwrap();
        assert_eq!(creds.token, "head");
        assert_eq!(creds.user_id, UserId(8));
    }
}
