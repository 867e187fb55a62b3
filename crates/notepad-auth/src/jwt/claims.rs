//! Claims read from an optional JWT bearer value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The subset of claims the decoder looks at. Unknown claims are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Standard subject claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Non-standard user id claim, string or number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Expiration timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl JwtClaims {
    /// The subject, preferring `sub` over `id`.
    pub fn subject(&self) -> Option<String> {
        if let Some(sub) = self.sub.as_deref().filter(|s| !s.is_empty()) {
            return Some(sub.to_string());
        }
        match &self.id {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Request extension recording who a valid JWT claimed to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtPrincipal {
    /// Value of the `sub` or `id` claim.
    pub subject: String,
}
