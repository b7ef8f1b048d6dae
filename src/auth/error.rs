//! Failure taxonomy for authentication attempts.
//!
//! Every failure is terminal for the attempt. The HTTP layer translates
//! each variant into a fixed client-facing message and status; internal
//! detail (decode errors, storage errors) is logged, never returned.

use axum::http::StatusCode;

/// Classified failure of a single authentication attempt.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // ---
    /// One of the required credential fields was absent or empty. The
    /// nonce was not looked up, so it remains valid for one retry.
    #[error("missing credentials")]
    MissingCredentials,

    /// The submitted nonce was never issued or was already used.
    #[error("invalid nonce")]
    InvalidNonce,

    /// The nonce existed but was older than the freshness window. It has
    /// been deleted; the client must request a new challenge.
    #[error("nonce expired")]
    NonceExpired,

    /// Signature verification failed, or the echoed message did not match
    /// the message derived from the nonce.
    #[error("invalid signature")]
    InvalidSignature,

    /// The public key or signature was not valid base58 of the expected
    /// length.
    #[error("malformed credential encoding: {0}")]
    Decode(#[from] super::signature::DecodeError),

    /// Persistence-layer failure. Infrastructure trouble, not credential
    /// invalidity; surfaced as an opaque 500.
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AuthError {
    // ---
    /// HTTP status for this failure class.
    pub fn status(&self) -> StatusCode {
        // ---
        match self {
            AuthError::MissingCredentials
            | AuthError::InvalidNonce
            | AuthError::NonceExpired
            | AuthError::Decode(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidSignature => StatusCode::UNAUTHORIZED,
            AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed client-facing message. Never includes internal detail.
    pub fn client_message(&self) -> &'static str {
        // ---
        match self {
            AuthError::MissingCredentials => "Missing credentials",
            AuthError::InvalidNonce => "Invalid nonce",
            AuthError::NonceExpired => "Nonce expired",
            AuthError::InvalidSignature => "Invalid signature",
            AuthError::Decode(_) => "Malformed public key or signature",
            AuthError::Storage(_) => "Internal server error",
        }
    }

    /// Stable label for metrics.
    pub fn outcome_label(&self) -> &'static str {
        // ---
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidNonce => "invalid_nonce",
            AuthError::NonceExpired => "nonce_expired",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Decode(_) => "decode_error",
            AuthError::Storage(_) => "storage_error",
        }
    }
}
