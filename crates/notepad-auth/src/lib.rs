//! # notepad-auth
//!
//! Credential primitives for Notepad Plus.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and the minimum-length policy
//! - `token`: opaque session tokens stored in `user_tokens`
//! - `jwt`: optional HS256 decoding of bearer values for request logging

pub mod jwt;
pub mod password;
pub mod token;

pub use jwt::{JwtClaims, JwtDecoder, JwtPrincipal};
pub use password::{PasswordHasher, PasswordValidator};
pub use token::{IssuedToken, SessionTokenIssuer};
