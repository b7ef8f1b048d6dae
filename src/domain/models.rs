use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user account backed by a wallet key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    // ---
    pub id: Uuid,
    pub username: String,

    /// Canonical base58 encoding of the wallet public key. Unique.
    pub wallet_address: String,

    pub email: String,
    pub fullname: String,

    /// Which authentication strategy created this account (e.g. "wallet").
    pub auth_strategy: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    // ---
    pub fn new(new_user: NewUser) -> Self {
        // ---
        Self {
            id: Uuid::new_v4(),
            username: new_user.username,
            wallet_address: new_user.wallet_address,
            email: new_user.email,
            fullname: new_user.fullname,
            auth_strategy: new_user.auth_strategy,
            created_at: Utc::now(),
        }
    }
}

/// Attributes for a user that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    // ---
    pub username: String,
    pub wallet_address: String,
    pub email: String,
    pub fullname: String,
    pub auth_strategy: String,
}

/// The identity payload carried by a session. Only the durable id is
/// stored; everything else is re-fetched on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    // ---
    pub id: Uuid,
}
