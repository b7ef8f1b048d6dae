//! Redis-backed session storage.
//!
//! Sessions are opaque UUID tokens mapping to a small JSON blob under
//! `session:{token}`. Only the durable user id is stored; user attributes
//! are re-fetched from the repository when needed.

use crate::domain::{SessionInfo, SessionStore};
use anyhow::{Context, Result};
use redis::{AsyncCommands, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

const KEY_PREFIX: &str = "session:";

/// Session data stored in Redis.
#[derive(Debug, Serialize, Deserialize)]
struct SessionData {
    // ---
    user_id: String,
    expires_at: i64,
}

pub struct RedisSessionStore {
    // ---
    client: Client,
    ttl: Duration,
}

impl RedisSessionStore {
    // ---
    pub fn new(client: Client, ttl: Duration) -> Self {
        // ---
        Self { client, ttl }
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection> {
        // ---
        self.client
            .get_multiplexed_async_connection()
            .await
            .context("failed to connect to Redis")
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    // ---
    async fn create(&self, user_id: Uuid) -> Result<String> {
        // ---
        let token = Uuid::new_v4().to_string();
        let expires_at = chrono::Utc::now().timestamp() + self.ttl.as_secs() as i64;

        let session_json = serde_json::to_string(&SessionData {
            user_id: user_id.to_string(),
            expires_at,
        })
        .context("failed to serialize session data")?;

        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(
            format!("{KEY_PREFIX}{token}"),
            session_json,
            self.ttl.as_secs(),
        )
        .await
        .context("failed to store session")?;

        tracing::info!("Created session for user: {}", user_id);

        Ok(token)
    }

    async fn validate(&self, token: &str) -> Result<Option<SessionInfo>> {
        // ---
        let mut conn = self.conn().await?;

        let raw: Option<String> = conn
            .get(format!("{KEY_PREFIX}{token}"))
            .await
            .context("failed to read session")?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let data: SessionData =
            serde_json::from_str(&raw).context("failed to deserialize session data")?;

        // Redis TTL normally expires the key first; the embedded expiry
        // is a second gate against clock-skewed TTL configs.
        if data.expires_at <= chrono::Utc::now().timestamp() {
            return Ok(None);
        }

        let user_id = Uuid::parse_str(&data.user_id).context("malformed user id in session")?;

        Ok(Some(SessionInfo { user_id }))
    }
}
