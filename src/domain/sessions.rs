//! Session storage abstraction.
//!
//! A session maps an opaque token to the authenticated user's durable id.
//! Only the id is stored; user attributes are re-fetched when needed.

use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

/// Data resolved from a valid session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    // ---
    pub user_id: Uuid,
}

/// Abstraction for session token persistence.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    // ---
    /// Create a session for a user and return the opaque token.
    async fn create(&self, user_id: Uuid) -> Result<String>;

    /// Resolve a token to its session, if the token is valid and unexpired.
    async fn validate(&self, token: &str) -> Result<Option<SessionInfo>>;
}

/// Type alias for any backend that implements SessionStore.
pub type SessionStorePtr = Arc<dyn SessionStore>;
