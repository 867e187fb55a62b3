//! User directory lookups.

use std::sync::Arc;

use notepad_core::error::AppError;
use notepad_database::UserStore;
use notepad_entity::user::User;

/// Maximum number of users returned by a search.
const SEARCH_LIMIT: i64 = 10;

/// Read-only access to registered users.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Users whose username or email contains `term`. A blank term matches
    /// nobody.
    pub async fn search(&self, term: &str) -> Result<Vec<User>, AppError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        self.users.search(term, SEARCH_LIMIT).await
    }

    /// Every registered user.
    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        self.users.list_all().await
    }
}
