//! Ed25519 signature verification for wallet authentication.
//!
//! Wire format: public keys and signatures travel as base58 strings
//! decoding to exactly 32 and 64 raw bytes respectively. This is the sole
//! supported encoding. The server stores only public keys; private keys
//! never leave the client.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Length of a raw Ed25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Length of a raw Ed25519 detached signature.
pub const SIGNATURE_LEN: usize = 64;

/// A malformed public key or signature encoding.
///
/// The variants exist for logging; clients only ever see a generic
/// message (see `AuthError`).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    // ---
    #[error("invalid base58: {0}")]
    Base58(String),

    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

/// Decode a base58 public key into its 32 raw bytes.
pub fn decode_public_key(encoded: &str) -> Result<[u8; PUBLIC_KEY_LEN], DecodeError> {
    // ---
    decode_fixed::<PUBLIC_KEY_LEN>(encoded)
}

/// Decode a base58 detached signature into its 64 raw bytes.
pub fn decode_signature(encoded: &str) -> Result<[u8; SIGNATURE_LEN], DecodeError> {
    // ---
    decode_fixed::<SIGNATURE_LEN>(encoded)
}

fn decode_fixed<const N: usize>(encoded: &str) -> Result<[u8; N], DecodeError> {
    // ---
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| DecodeError::Base58(e.to_string()))?;

    let actual = bytes.len();
    bytes.try_into().map_err(|_| DecodeError::Length {
        expected: N,
        actual,
    })
}

/// Verify an Ed25519 detached signature over a message.
///
/// Returns `true` only if the signature is valid for the exact message
/// bytes under the given public key. A key that is not a valid curve
/// point yields `false`, never an error.
pub fn verify(
    message: &[u8],
    signature: &[u8; SIGNATURE_LEN],
    public_key: &[u8; PUBLIC_KEY_LEN],
) -> bool {
    // ---
    let verifying_key = match VerifyingKey::from_bytes(public_key) {
        Ok(k) => k,
        Err(_) => return false,
    };

    let sig = Signature::from_bytes(signature);

    verifying_key.verify(message, &sig).is_ok()
}

/// Generate a new Ed25519 keypair for testing.
///
/// Returns (private_key_bytes, public_key_bytes).
#[cfg(test)]
pub fn generate_keypair() -> ([u8; 32], [u8; 32]) {
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;

    let signing_key = SigningKey::generate(&mut OsRng);
    let verifying_key = signing_key.verifying_key();

    (signing_key.to_bytes(), verifying_key.to_bytes())
}

/// Sign a message with a private key (for testing).
#[cfg(test)]
pub fn sign_message(private_key: &[u8; 32], message: &[u8]) -> [u8; 64] {
    use ed25519_dalek::{Signer, SigningKey};

    let signing_key = SigningKey::from_bytes(private_key);
    signing_key.sign(message).to_bytes()
}
