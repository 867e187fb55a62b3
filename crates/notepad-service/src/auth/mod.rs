//! Registration, login, and bearer token validation.

pub mod service;

pub use service::{AuthService, AuthSession, RegisterInput};
