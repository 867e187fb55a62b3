//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use notepad_core::types::UserId;

/// Context for the current authenticated request.
///
/// Built by the authentication extractor and passed into service methods
/// so that every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's id.
    pub user_id: UserId,
    /// IP address of the request origin.
    pub ip_address: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Create a context stamped with the current time.
    pub fn new(user_id: UserId, ip_address: impl Into<String>) -> Self {
        Self {
            user_id,
            ip_address: ip_address.into(),
            request_time: Utc::now(),
        }
    }
}
