//! Optional JWT decoding. Never used to grant or deny access.

pub mod claims;
pub mod decoder;

pub use claims::{JwtClaims, JwtPrincipal};
pub use decoder::JwtDecoder;
