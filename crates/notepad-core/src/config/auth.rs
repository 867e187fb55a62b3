//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Lifetime of an issued session token, in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: i64,
    /// Secret key for decoding optional HS256 bearer JWTs.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected JWT issuer, if any.
    #[serde(default)]
    pub jwt_issuer: Option<String>,
    /// Expected JWT audience, if any.
    #[serde(default)]
    pub jwt_audience: Option<String>,
    /// Minimum password length at registration.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl(),
            jwt_secret: default_jwt_secret(),
            jwt_issuer: None,
            jwt_audience: None,
            password_min_length: default_password_min(),
        }
    }
}

fn default_token_ttl() -> i64 {
    24
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_password_min() -> usize {
    6
}
