//! HS256 validation of bearer values that happen to be JWTs.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use notepad_core::config::AuthConfig;

use super::claims::{JwtClaims, JwtPrincipal};

/// Validates JWTs against the shared secret.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Build a decoder from auth configuration. Returns `None` when no
    /// secret is configured.
    pub fn new(config: &AuthConfig) -> Option<Self> {
        if config.jwt_secret.is_empty() {
            return None;
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.leeway = 5;
        if let Some(issuer) = &config.jwt_issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.jwt_audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Some(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }

    /// Decode and verify a token. Any failure yields `None`.
    pub fn decode(&self, token: &str) -> Option<JwtClaims> {
        match decode::<JwtClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!(error = %e, "Bearer value is not a valid JWT");
                None
            }
        }
    }

    /// Decode a token and extract its principal.
    pub fn principal(&self, token: &str) -> Option<JwtPrincipal> {
        self.decode(token)
            .and_then(|claims| claims.subject())
            .map(|subject| JwtPrincipal { subject })
    }
}
