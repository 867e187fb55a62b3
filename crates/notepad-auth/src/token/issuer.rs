//! Generation of opaque bearer tokens and their expiry.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};

use notepad_core::config::AuthConfig;

/// Number of random bytes behind each token.
const TOKEN_BYTES: usize = 32;

/// A freshly generated token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Base64url token value, without padding, sent as `Authorization: Bearer <token>`.
    pub token: String,
    /// Expiry stored alongside the token.
    pub expires_at: DateTime<Utc>,
}

/// Issues random session tokens with a fixed lifetime.
#[derive(Debug, Clone)]
pub struct SessionTokenIssuer {
    ttl: Duration,
}

impl SessionTokenIssuer {
    /// Build an issuer using `auth.token_ttl_hours`.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    /// Generate a token that expires `ttl` after `now`.
    pub fn issue_at(&self, now: DateTime<Utc>) -> IssuedToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        IssuedToken {
            token: URL_SAFE_NO_PAD.encode(bytes),
            expires_at: now + self.ttl,
        }
    }

    /// Generate a token that expires `ttl` from now.
    pub fn issue(&self) -> IssuedToken {
        self.issue_at(Utc::now())
    }
}
