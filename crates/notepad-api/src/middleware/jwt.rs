//! Informational JWT decoding.
//!
//! Access is decided by the `AuthUser` extractor. This layer only records
//! who a bearer JWT claims to be and never rejects a request.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::state::AppState;

/// Decodes a bearer JWT, when one is present, into a `JwtPrincipal` extension.
pub async fn decode_jwt(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(decoder) = &state.jwt_decoder {
        let principal = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|token| decoder.principal(token));
        if let Some(principal) = principal {
            debug!(subject = %principal.subject, "Decoded JWT principal");
            request.extensions_mut().insert(principal);
        }
    }
    next.run(request).await
}
