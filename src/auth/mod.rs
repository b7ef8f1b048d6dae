// Gateway module - controls public API for the authentication core
// Modules are private, only exported symbols are public

mod error;
mod message;
mod provision;
mod registry;
mod signature;
mod wallet;

pub use error::AuthError;
pub use message::challenge_message;
pub use provision::UserProvisioner;
pub use registry::{AuthRegistry, AuthStrategy, Authenticator};
pub use signature::{decode_public_key, decode_signature, verify, DecodeError};
pub use wallet::{Challenge, WalletAuthenticator, WalletCredential};
