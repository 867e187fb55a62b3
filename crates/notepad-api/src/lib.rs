//! # notepad-api
//!
//! HTTP API layer for Notepad Plus built on Axum.
//!
//! Provides the REST endpoints, the notification hub upgrade, middleware
//! (rate limiting, CORS, security headers, logging, JWT decoding),
//! extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
