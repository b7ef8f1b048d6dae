mod nonce_store;
mod session_store;

pub use nonce_store::RedisNonceStore;
pub use session_store::RedisSessionStore;
