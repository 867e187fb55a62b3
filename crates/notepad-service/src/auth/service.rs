//! Account registration, login, and session token checks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use notepad_auth::{PasswordHasher, PasswordValidator, SessionTokenIssuer};
use notepad_core::error::AppError;
use notepad_core::types::UserId;
use notepad_database::{TokenStore, UserStore};
use notepad_entity::user::{CreateUser, User};

/// Data supplied on registration.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Display name. Stored empty when omitted.
    pub name: Option<String>,
}

/// A user and the session token issued to them.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Handles the `/api/auth` flows and the per-request token check.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenStore>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    issuer: SessionTokenIssuer,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenStore>,
        validator: PasswordValidator,
        issuer: SessionTokenIssuer,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher: PasswordHasher::new(),
            validator,
            issuer,
        }
    }

    /// Create an account and log it in.
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AppError> {
        let username = input.username.trim().to_string();
        let email = input.email.trim().to_string();

        if self.users.username_exists(&username).await? {
            return Err(AppError::validation("Username already exists"));
        }
        if self.users.email_exists(&email).await? {
            return Err(AppError::validation("Email already registered"));
        }
        self.validator.validate(&input.password)?;

        let password_hash = self.hasher.hash_password(&input.password)?;
        let user = self
            .users
            .create(&CreateUser {
                name: input.name.unwrap_or_default(),
                username,
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        self.start_session(user).await
    }

    /// Check credentials. `login` may be a username or an email.
    pub async fn login(
        &self,
        login: &str,
        password: &str,
        ip_address: &str,
    ) -> Result<AuthSession, AppError> {
        let invalid = || AppError::authentication("Invalid username/email or password");

        let Some(user) = self.users.find_by_login(login.trim()).await? else {
            warn!(login, ip = ip_address, "Login failed: unknown user");
            return Err(invalid());
        };
        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, ip = ip_address, "Login failed: wrong password");
            return Err(invalid());
        }

        info!(user_id = %user.id, ip = ip_address, "User logged in");
        self.start_session(user).await
    }

    async fn start_session(&self, user: User) -> Result<AuthSession, AppError> {
        let issued = self.issuer.issue();
        self.tokens
            .create(user.id, &issued.token, issued.expires_at)
            .await?;
        Ok(AuthSession {
            user,
            token: issued.token,
        })
    }

    /// Accept `token` only if it was issued to `user_id` and is unexpired at `now`.
    pub async fn authenticate(
        &self,
        token: &str,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<UserId, AppError> {
        match self.tokens.find_valid(token, user_id, now).await? {
            Some(row) => Ok(row.user_id),
            None => {
                warn!(user_id = %user_id, "Rejected invalid or expired token");
                Err(AppError::authentication("Invalid or expired token"))
            }
        }
    }
}
