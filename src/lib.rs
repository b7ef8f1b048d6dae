// src/lib.rs
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};

use auth::{AuthRegistry, AuthStrategy, Authenticator, WalletAuthenticator};
use domain::{NonceStorePtr, SessionStorePtr};
use redis::Client;
use std::env;
use std::sync::Arc;

// Public exports (visible outside this module)
pub mod auth;
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;

// Hoist up only the public symbol(s)
pub use app_state::AppState;
pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_noop_metrics, // ---
    create_postgres_repository,
    create_prom_metrics,
    RedisNonceStore,
    RedisSessionStore,
};

/// Build the HTTP router around an already-assembled application state.
///
/// Split out from [`create_router`] so tests can drive the full HTTP
/// surface with in-memory backends.
pub fn app_router(state: AppState) -> Router {
    // ---
    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest(
            "/auth",
            Router::new()
                .route("/{strategy}/challenge", post(handlers::challenge))
                .route("/{strategy}/login", post(handlers::login)),
        )
        .with_state(state)
}

/// Build the HTTP router with backends determined by environment variables.
///
/// Expects the database pool to have been initialized (see
/// [`domain::init_database_with_retry_from_env`]).
pub fn create_router() -> Result<Router> {
    // ---
    // Load all configuration from environment
    let config = AppConfig::from_env()?;

    // Determine metrics implementation from environment
    let metrics_type = env::var("AUTH_METRICS_TYPE").unwrap_or_else(|_| "noop".to_string());
    let metrics = if metrics_type == "prom" {
        create_prom_metrics()?
    } else {
        create_noop_metrics()?
    };

    tracing_subscriber::fmt::try_init().ok(); // Ignores if already initialized

    // Create infrastructure dependencies
    let redis_client = Client::open(config.redis.url.clone())?;
    let repository = create_postgres_repository()?;
    let nonces: NonceStorePtr = Arc::new(RedisNonceStore::new(
        redis_client.clone(),
        config.redis.nonce_ttl,
    ));
    let sessions: SessionStorePtr = Arc::new(RedisSessionStore::new(
        redis_client,
        config.redis.session_ttl,
    ));

    // Strategy registry: built once here, never extended at runtime.
    // Only wallet signature login is served by this process.
    let wallet = Arc::new(WalletAuthenticator::new(nonces.clone(), repository.clone()));
    let registry = AuthRegistry::new().register(
        AuthStrategy::WalletSignature,
        Authenticator::WalletSignature(wallet),
    );

    // Build application state with all dependencies
    let app_state = AppState::new(repository, nonces, sessions, metrics, registry);

    Ok(app_router(app_state))
}
