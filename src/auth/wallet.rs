//! Wallet signature authentication protocol.
//!
//! Challenge-response in one round trip: the server issues a single-use
//! nonce, the client signs the derived challenge message with its wallet
//! key, the server verifies and resolves the identity. Taking the nonce
//! out of the store is the commit point of an attempt: it happens
//! atomically before the signature is examined, so neither a failed nor a
//! successful verification leaves the nonce replayable.

use crate::auth::error::AuthError;
use crate::auth::message::challenge_message;
use crate::auth::provision::UserProvisioner;
use crate::auth::signature;
use crate::domain::{NonceStorePtr, NonceTake, RepositoryPtr, UserSession};
use serde::Deserialize;

/// A freshly issued challenge: the nonce and the exact text to sign.
#[derive(Debug, Clone)]
pub struct Challenge {
    // ---
    pub nonce: String,
    pub message: String,
}

/// Raw credential submission. Field presence is part of the protocol,
/// so everything is optional at this layer.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct WalletCredential {
    // ---
    pub public_key: Option<String>,
    pub signature: Option<String>,
    pub message: Option<String>,
    pub nonce: Option<String>,
    pub email: Option<String>,
    pub fullname: Option<String>,
}

/// The wallet authentication state machine.
pub struct WalletAuthenticator {
    // ---
    nonces: NonceStorePtr,
    provisioner: UserProvisioner,
}

impl WalletAuthenticator {
    // ---
    pub fn new(nonces: NonceStorePtr, users: RepositoryPtr) -> Self {
        // ---
        Self {
            nonces,
            provisioner: UserProvisioner::new(users),
        }
    }

    /// Issue a new challenge: persist a nonce and derive the message the
    /// client must sign. The same derivation runs again at verification,
    /// so the displayed text and the verified bytes cannot diverge.
    pub async fn issue_challenge(&self) -> Result<Challenge, AuthError> {
        // ---
        let nonce = self.nonces.issue().await?;
        let message = challenge_message(&nonce);

        Ok(Challenge { nonce, message })
    }

    /// Run one authentication attempt to completion.
    ///
    /// Single pass, no internal retries. Once the nonce has been taken,
    /// every failure is terminal for that nonce; only a missing-field
    /// rejection (which happens before the lookup) leaves it usable.
    pub async fn authenticate(&self, cred: WalletCredential) -> Result<UserSession, AuthError> {
        // ---
        let public_key = required(cred.public_key)?;
        let sig_encoded = required(cred.signature)?;
        let message = required(cred.message)?;
        let nonce = required(cred.nonce)?;

        match self.nonces.take(&nonce).await? {
            NonceTake::Fresh => {}
            NonceTake::NotFound => return Err(AuthError::InvalidNonce),
            NonceTake::Expired => {
                tracing::warn!("Rejected expired nonce");
                return Err(AuthError::NonceExpired);
            }
        }

        // The echoed message is never trusted: recompute from the nonce
        // and require an exact match before the bytes are verified.
        let expected = challenge_message(&nonce);
        if message != expected {
            tracing::warn!("Submitted message does not match the issued challenge");
            return Err(AuthError::InvalidSignature);
        }

        let key_bytes = signature::decode_public_key(&public_key).map_err(|e| {
            tracing::warn!("Malformed public key: {e}");
            AuthError::Decode(e)
        })?;
        let sig_bytes = signature::decode_signature(&sig_encoded).map_err(|e| {
            tracing::warn!("Malformed signature: {e}");
            AuthError::Decode(e)
        })?;

        if !signature::verify(expected.as_bytes(), &sig_bytes, &key_bytes) {
            tracing::warn!("Signature verification failed");
            return Err(AuthError::InvalidSignature);
        }

        // Store the canonical re-encoding, not the client's spelling.
        let wallet_address = bs58::encode(key_bytes).into_string();

        let user = self
            .provisioner
            .resolve_or_create(&wallet_address, cred.email.as_deref(), cred.fullname.as_deref())
            .await?;

        tracing::info!("Wallet {} authenticated as user {}", wallet_address, user.id);

        Ok(UserSession { id: user.id })
    }
}

fn required(field: Option<String>) -> Result<String, AuthError> {
    // ---
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AuthError::MissingCredentials),
    }
}
