//! Postgres-backed persistence.
//!
//! The connection pool is process-global: initialized once (with retry,
//! since the database may come up after the service in containerized
//! deployments) and shared by every repository handle.

mod postgres_repository;

use crate::config::DatabaseConfig;
use crate::domain::RepositoryPtr;
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub use postgres_repository::PostgresRepository;

static POOL: OnceCell<PgPool> = OnceCell::new();

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id             UUID PRIMARY KEY,
    username       TEXT NOT NULL,
    wallet_address TEXT NOT NULL,
    email          TEXT NOT NULL DEFAULT '',
    fullname       TEXT NOT NULL DEFAULT '',
    auth_strategy  TEXT NOT NULL DEFAULT 'wallet',
    created_at     TIMESTAMPTZ NOT NULL,
    CONSTRAINT users_username_key UNIQUE (username),
    CONSTRAINT users_wallet_address_key UNIQUE (wallet_address)
)
"#;

/// Initialize the global pool from environment configuration. Idempotent;
/// safe to call from every test and from main.
pub async fn init_database_with_retry_from_env() -> Result<()> {
    // ---
    init_database_with_retry(&DatabaseConfig::from_env()?).await
}

/// Initialize the global pool, retrying until the database accepts
/// connections, then apply the idempotent schema.
pub async fn init_database_with_retry(config: &DatabaseConfig) -> Result<()> {
    // ---
    if POOL.get().is_some() {
        return Ok(());
    }

    let mut last_err = None;
    for attempt in 1..=config.retry_count {
        // ---
        match PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                sqlx::query(SCHEMA)
                    .execute(&pool)
                    .await
                    .context("failed to apply database schema")?;

                // A concurrent initializer may have won; that pool is
                // just as good.
                let _ = POOL.set(pool);
                tracing::info!("Database pool initialized (attempt {attempt})");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Database connection attempt {attempt} failed: {e}");
                last_err = Some(e);
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            }
        }
    }

    Err(anyhow::anyhow!(
        "database unreachable after {} attempts: {:?}",
        config.retry_count,
        last_err
    ))
}

/// Create a repository over the initialized global pool.
pub fn create_postgres_repository() -> Result<RepositoryPtr> {
    // ---
    let pool = POOL
        .get()
        .context("database pool not initialized; call init_database_with_retry first")?
        .clone();

    Ok(Arc::new(PostgresRepository::new(pool)))
}
