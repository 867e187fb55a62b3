//! Opaque session tokens.

pub mod issuer;

pub use issuer::{IssuedToken, SessionTokenIssuer};
