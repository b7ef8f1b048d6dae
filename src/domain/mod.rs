mod metrics;
mod models;
mod nonce;
mod repository;
mod sessions;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Publicly expose persistence abstractions and models
pub use models::{NewUser, User, UserSession};
pub use nonce::{generate_value as generate_nonce_value, NonceStore, NonceStorePtr, NonceTake};
pub use repository::{CreateUserError, Repository, RepositoryPtr};
pub use sessions::{SessionInfo, SessionStore, SessionStorePtr};

// Database initialization lives in infrastructure but is re-exported here
// so callers (main, tests) depend on the domain facade only.
pub use crate::infrastructure::init_database_with_retry_from_env;
