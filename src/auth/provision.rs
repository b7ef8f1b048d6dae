//! First-login user provisioning.
//!
//! Maps a verified wallet address to a user, creating one with a
//! collision-free username on first sight. Uniqueness is enforced by the
//! repository's constraints at insert time, not by a pre-insert probe:
//! a username collision drives the retry loop, a wallet collision means a
//! concurrent first-login won the race and we return its row.

use crate::auth::error::AuthError;
use crate::domain::{CreateUserError, NewUser, RepositoryPtr, User};
use rand::Rng;

/// Strategy tag recorded on accounts created by wallet login.
const WALLET_STRATEGY_TAG: &str = "wallet";

/// Hard cap on username-collision retries. With a 4-digit random suffix
/// plus an incrementing counter this is unreachable in practice.
const MAX_USERNAME_ATTEMPTS: u32 = 100;

/// Resolves or creates the user identity for a verified wallet address.
pub struct UserProvisioner {
    // ---
    users: RepositoryPtr,
}

impl UserProvisioner {
    // ---
    pub fn new(users: RepositoryPtr) -> Self {
        // ---
        Self { users }
    }

    /// Look up the user owning `wallet_address`, creating one on first
    /// login. Idempotent: repeat logins return the stored row unchanged,
    /// without updating email or fullname.
    pub async fn resolve_or_create(
        &self,
        wallet_address: &str,
        email: Option<&str>,
        fullname: Option<&str>,
    ) -> Result<User, AuthError> {
        // ---
        if let Some(user) = self.users.get_user_by_wallet(wallet_address).await? {
            return Ok(user);
        }

        let base = candidate_username(wallet_address);

        for attempt in 0..MAX_USERNAME_ATTEMPTS {
            // ---
            let username = if attempt == 0 {
                base.clone()
            } else {
                format!("{base}{attempt}")
            };

            let new_user = NewUser {
                username,
                wallet_address: wallet_address.to_string(),
                email: email.unwrap_or_default().to_string(),
                fullname: fullname.unwrap_or_default().to_string(),
                auth_strategy: WALLET_STRATEGY_TAG.to_string(),
            };

            match self.users.create_user(new_user).await {
                Ok(user) => {
                    tracing::info!(
                        "Provisioned user '{}' for wallet {}",
                        user.username,
                        wallet_address
                    );
                    return Ok(user);
                }
                Err(CreateUserError::UsernameTaken) => {
                    // Another account holds this candidate; extend the
                    // suffix and try again.
                    tracing::debug!("Username candidate taken, retrying (attempt {attempt})");
                    continue;
                }
                Err(CreateUserError::WalletTaken) => {
                    // Concurrent first-login for the same wallet beat us
                    // to the insert. Its row is the identity.
                    let existing = self
                        .users
                        .get_user_by_wallet(wallet_address)
                        .await?
                        .ok_or_else(|| {
                            anyhow::anyhow!("wallet reported taken but row not readable")
                        })?;
                    return Ok(existing);
                }
                Err(CreateUserError::Storage(e)) => return Err(AuthError::Storage(e)),
            }
        }

        Err(AuthError::Storage(anyhow::anyhow!(
            "exhausted username candidates for wallet {wallet_address}"
        )))
    }
}

/// Derive the base username candidate for a wallet address: first six
/// characters lowercased plus a zero-padded random 4-digit suffix.
fn candidate_username(wallet_address: &str) -> String {
    // ---
    let prefix: String = wallet_address
        .chars()
        .take(6)
        .flat_map(char::to_lowercase)
        .collect();
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);

    format!("{prefix}{suffix:04}")
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::domain::Repository;
    use anyhow::Result;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    /// In-memory repository with the same unique constraints as Postgres.
    #[derive(Default)]
    struct MemoryRepository {
        // ---
        users: Mutex<HashMap<Uuid, User>>,
        /// When set, the first N creates fail with UsernameTaken even if
        /// the name is free, simulating a losing race.
        forced_username_conflicts: Mutex<u32>,
        /// When set, the next create inserts a rival row for the same
        /// wallet first and fails with WalletTaken, simulating a lost
        /// first-login race.
        forced_wallet_conflicts: Mutex<u32>,
    }

    #[async_trait::async_trait]
    impl Repository for MemoryRepository {
        // ---
        async fn create_user(&self, new_user: NewUser) -> Result<User, CreateUserError> {
            // ---
            {
                let mut forced = self.forced_username_conflicts.lock().unwrap();
                if *forced > 0 {
                    *forced -= 1;
                    return Err(CreateUserError::UsernameTaken);
                }
            }

            {
                let mut forced = self.forced_wallet_conflicts.lock().unwrap();
                if *forced > 0 {
                    *forced -= 1;
                    let rival = User::new(NewUser {
                        username: "rival0001".to_string(),
                        wallet_address: new_user.wallet_address.clone(),
                        email: String::new(),
                        fullname: String::new(),
                        auth_strategy: WALLET_STRATEGY_TAG.to_string(),
                    });
                    self.users.lock().unwrap().insert(rival.id, rival);
                    return Err(CreateUserError::WalletTaken);
                }
            }

            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.username == new_user.username) {
                return Err(CreateUserError::UsernameTaken);
            }
            if users.values().any(|u| u.wallet_address == new_user.wallet_address) {
                return Err(CreateUserError::WalletTaken);
            }

            let user = User::new(new_user);
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn get_user_by_wallet(&self, wallet_address: &str) -> Result<Option<User>> {
            // ---
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.wallet_address == wallet_address)
                .cloned())
        }

        async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
            // ---
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
            // ---
            Ok(self.users.lock().unwrap().get(&user_id).cloned())
        }
    }

    const WALLET: &str = "9aE476sH92Vz7DMPyq5WLPkrKWivxeuTKEFKd2sZZcde";

    #[tokio::test]
    async fn first_login_creates_exactly_one_user() {
        // ---
        let repo = Arc::new(MemoryRepository::default());
        let provisioner = UserProvisioner::new(repo.clone());

        let user = provisioner
            .resolve_or_create(WALLET, Some("a@b.c"), Some("Ada"))
            .await
            .unwrap();

        assert_eq!(user.wallet_address, WALLET);
        assert_eq!(user.email, "a@b.c");
        assert_eq!(user.fullname, "Ada");
        assert_eq!(user.auth_strategy, "wallet");
        assert!(user.username.starts_with("9ae476"));
        assert_eq!(repo.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn repeat_login_returns_same_user_without_mutation() {
        // ---
        let repo = Arc::new(MemoryRepository::default());
        let provisioner = UserProvisioner::new(repo.clone());

        let first = provisioner
            .resolve_or_create(WALLET, Some("a@b.c"), None)
            .await
            .unwrap();
        let second = provisioner
            .resolve_or_create(WALLET, Some("other@x.y"), Some("Someone Else"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.email, "a@b.c");
        assert_eq!(second.fullname, "");
        assert_eq!(repo.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn username_collisions_are_retried_until_distinct() {
        // ---
        let repo = Arc::new(MemoryRepository::default());
        *repo.forced_username_conflicts.lock().unwrap() = 3;

        let provisioner = UserProvisioner::new(repo.clone());
        let user = provisioner
            .resolve_or_create(WALLET, None, None)
            .await
            .unwrap();

        // Three candidates were rejected; the accepted one carries the
        // incrementing suffix.
        assert!(user.username.ends_with('3'), "got {}", user.username);
    }

    #[tokio::test]
    async fn lost_wallet_race_resolves_to_the_winning_row() {
        // ---
        let repo = Arc::new(MemoryRepository::default());
        *repo.forced_wallet_conflicts.lock().unwrap() = 1;

        // A concurrent first-login wins the insert between our lookup
        // and our create; its row must become the identity.
        let provisioner = UserProvisioner::new(repo.clone());
        let user = provisioner
            .resolve_or_create(WALLET, Some("late@x.y"), None)
            .await
            .unwrap();

        assert_eq!(user.username, "rival0001");
        assert_eq!(user.wallet_address, WALLET);
        assert_eq!(repo.users.lock().unwrap().len(), 1, "no duplicate row");
    }

    #[tokio::test]
    async fn missing_email_and_fullname_default_to_empty() {
        // ---
        let repo = Arc::new(MemoryRepository::default());
        let provisioner = UserProvisioner::new(repo);

        let user = provisioner.resolve_or_create(WALLET, None, None).await.unwrap();
        assert_eq!(user.email, "");
        assert_eq!(user.fullname, "");
    }

    #[test]
    fn candidate_username_shape() {
        // ---
        let candidate = candidate_username(WALLET);
        assert_eq!(candidate.len(), 10);
        assert!(candidate.starts_with("9ae476"));
        assert!(candidate[6..].chars().all(|c| c.is_ascii_digit()));
    }
}
