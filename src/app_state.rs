//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` contains shared
//! resources like the user repository, nonce and session stores, metrics
//! implementation, and the authentication strategy registry.
//!
//! The state is designed to be cheaply cloneable (using `Arc` internally
//! where needed) so it can be passed efficiently to each request handler
//! without expensive copying of resources.

use crate::auth::AuthRegistry;
use crate::domain::{MetricsPtr, NonceStorePtr, RepositoryPtr, SessionStorePtr};
use std::sync::Arc;

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the
/// application. It holds all shared resources needed by HTTP handlers and
/// is cloned cheaply for each request via Axum's `State` extractor.
///
/// # Design Principles
///
/// - **Dependency Inversion**: Handlers depend on abstractions (Repository,
///   NonceStore, SessionStore traits), not concrete backends.
/// - **Immutable After Initialization**: State is built once at startup and
///   never mutated; in particular the strategy registry is fixed at
///   construction time instead of being extended at runtime.
/// - **Cheap Cloning**: All heavy resources are wrapped in `Arc`, making
///   the struct efficiently cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Repository abstraction for persistent user storage.
    repository: RepositoryPtr,

    /// Store for single-use challenge nonces.
    nonces: NonceStorePtr,

    /// Store for session tokens.
    sessions: SessionStorePtr,

    /// Metrics implementation for recording application events.
    metrics: MetricsPtr,

    /// Authentication strategy registry, built once at startup.
    auth: Arc<AuthRegistry>,
}

impl AppState {
    // ---

    pub fn new(
        repository: RepositoryPtr,
        nonces: NonceStorePtr,
        sessions: SessionStorePtr,
        metrics: MetricsPtr,
        auth: AuthRegistry,
    ) -> Self {
        // ---
        AppState {
            repository,
            nonces,
            sessions,
            metrics,
            auth: Arc::new(auth),
        }
    }

    /// Get a reference to the repository implementation.
    pub fn repository(&self) -> &RepositoryPtr {
        // ---
        &self.repository
    }

    /// Get a reference to the nonce store.
    pub fn nonces(&self) -> &NonceStorePtr {
        // ---
        &self.nonces
    }

    /// Get a reference to the session store.
    pub fn sessions(&self) -> &SessionStorePtr {
        // ---
        &self.sessions
    }

    /// Get a reference to the metrics implementation.
    pub fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get a reference to the authentication strategy registry.
    pub fn auth(&self) -> &AuthRegistry {
        // ---
        &self.auth
    }
}
