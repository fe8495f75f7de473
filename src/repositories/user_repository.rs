use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::models::{RepositoryError, RepositoryResult, User};

/// Trait defining the interface for shop user storage
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by exact username
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    /// Append a user. `ConstraintViolation` when the username is taken.
    async fn insert(&self, user: User) -> RepositoryResult<User>;
}

/// Process-lifetime user collection
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.username == username).cloned())
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, user: User) -> RepositoryResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|existing| existing.username == user.username) {
            return Err(RepositoryError::ConstraintViolation {
                message: format!("username '{}' already registered", user.username),
            });
        }

        users.push(user.clone());
        Ok(user)
    }
}
