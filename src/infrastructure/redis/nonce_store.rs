//! Redis-backed nonce store.
//!
//! Each nonce lives at `auth:nonce:{value}` with its creation unix
//! timestamp as the stored payload. Freshness is judged in code from the
//! timestamp so an expired nonce is reported as expired rather than
//! unknown; the Redis TTL (12x the freshness window) only garbage-collects
//! values that were never submitted. Consumption uses `GETDEL`: lookup and
//! delete are one storage operation, so a nonce can be observed fresh by
//! at most one request.

use crate::domain::{generate_nonce_value, NonceStore, NonceTake};
use anyhow::{Context, Result};
use redis::{AsyncCommands, Client};
use std::time::Duration;

const KEY_PREFIX: &str = "auth:nonce:";

/// Multiple of the freshness window after which Redis drops the record.
const GC_TTL_FACTOR: u32 = 12;

pub struct RedisNonceStore {
    // ---
    client: Client,
    freshness_window: Duration,
}

impl RedisNonceStore {
    // ---
    pub fn new(client: Client, freshness_window: Duration) -> Self {
        // ---
        Self {
            client,
            freshness_window,
        }
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
impl NonceStore for RedisNonceStore {
    // ---
    async fn issue(&self) -> Result<String> {
        // ---
        let value = generate_nonce_value();
        let created_at = chrono::Utc::now().timestamp();
        let gc_ttl = self.freshness_window.as_secs() * u64::from(GC_TTL_FACTOR);

        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(format!("{KEY_PREFIX}{value}"), created_at, gc_ttl)
            .await
            .context("failed to store nonce")?;

        Ok(value)
    }

    async fn take(&self, value: &str) -> Result<NonceTake> {
        // ---
        let mut conn = self.conn().await?;

        // GETDEL: whoever gets the value owns it, everyone else sees nil.
        let stored: Option<String> = conn
            .get_del(format!("{KEY_PREFIX}{value}"))
            .await
            .context("failed to take nonce")?;

        let created_at = match stored {
            Some(raw) => match raw.parse::<i64>() {
                Ok(ts) => ts,
                Err(_) => {
                    tracing::warn!("Discarding nonce with unparseable timestamp");
                    return Ok(NonceTake::NotFound);
                }
            },
            None => return Ok(NonceTake::NotFound),
        };

        let age = chrono::Utc::now().timestamp() - created_at;
        if age > self.freshness_window.as_secs() as i64 {
            return Ok(NonceTake::Expired);
        }

        Ok(NonceTake::Fresh)
    }
}
