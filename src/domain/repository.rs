use super::models::{NewUser, User};
use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

/// Error returned by [`Repository::create_user`].
///
/// Unique-constraint violations are split out so callers can resolve
/// create races (retry the username, re-read the wallet) instead of
/// treating them as storage failures.
#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    // ---
    #[error("username already taken")]
    UsernameTaken,

    #[error("wallet address already registered")]
    WalletTaken,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Abstraction for user persistence.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    // ---
    /// Create a new user. The username and wallet address must both be
    /// unique; violations are reported as distinct error variants.
    async fn create_user(&self, new_user: NewUser) -> Result<User, CreateUserError>;

    /// Get user by wallet address.
    async fn get_user_by_wallet(&self, wallet_address: &str) -> Result<Option<User>>;

    /// Get user by username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Get user by ID.
    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>>;
}

/// Type alias for any backend that implements Repository.
pub type RepositoryPtr = Arc<dyn Repository>;
