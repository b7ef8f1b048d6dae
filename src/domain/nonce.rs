//! Single-use challenge nonces.
//!
//! A nonce is 32 random bytes, hex-encoded (64 lowercase characters). The
//! store records its creation time; a nonce is fresh for a bounded window
//! and may be taken exactly once. Lookup and deletion are a single atomic
//! operation so two concurrent submissions of the same nonce can never
//! both observe it as present.

use anyhow::Result;
use rand::RngCore;
use std::sync::Arc;

/// Byte length of a nonce before hex encoding.
pub const NONCE_BYTES: usize = 32;

/// Outcome of taking a nonce out of the store.
///
/// `Expired` and `NotFound` are distinct so the caller can report them
/// differently; in both cases the value is no longer present afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonceTake {
    // ---
    /// The nonce existed and was within the freshness window. It has been
    /// removed; this is the only path on which verification may proceed.
    Fresh,

    /// The nonce existed but was older than the freshness window. Removed.
    Expired,

    /// No such nonce (never issued, already taken, or garbage-collected).
    NotFound,
}

/// Abstraction for nonce persistence shared by every instance of the
/// service. Correctness depends on all instances seeing one store.
#[async_trait::async_trait]
pub trait NonceStore: Send + Sync {
    // ---
    /// Generate a fresh nonce, persist it with the current timestamp, and
    /// return its encoded value.
    async fn issue(&self) -> Result<String>;

    /// Atomically look up and delete a nonce, classifying the result.
    async fn take(&self, value: &str) -> Result<NonceTake>;
}

/// Type alias for any backend that implements NonceStore.
pub type NonceStorePtr = Arc<dyn NonceStore>;

/// Generate a new nonce value: 32 bytes from the OS RNG, lowercase hex.
pub fn generate_value() -> String {
    // ---
    let mut bytes = [0u8; NONCE_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
