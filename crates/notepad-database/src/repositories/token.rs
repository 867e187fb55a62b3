//! Session token repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use notepad_core::error::{AppError, ErrorKind};
use notepad_core::result::AppResult;
use notepad_core::types::UserId;
use notepad_entity::token::UserToken;

use crate::store::TokenStore;

/// Repository for `user_tokens`.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for TokenRepository {
    async fn create(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<UserToken> {
        sqlx::query_as::<_, UserToken>(
            "INSERT INTO user_tokens (user_id, token, expires_at) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store token", e))
    }

    async fn find_valid(
        &self,
        token: &str,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserToken>> {
        sqlx::query_as::<_, UserToken>(
            "SELECT * FROM user_tokens WHERE token = $1 AND user_id = $2 AND expires_at > $3",
        )
        .bind(token)
        .bind(user_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up token", e))
    }
}
