//! Axum middleware stack.

pub mod cors;
pub mod jwt;
pub mod logging;
pub mod rate_limit;
pub mod security_headers;
