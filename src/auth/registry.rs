//! Authentication strategy registry.
//!
//! Built once at startup and carried in `AppState`; handlers look
//! strategies up by tag instead of consulting any global authenticator
//! instance. Strategies that this service does not implement (form login,
//! OAuth federation) keep their tags so routes stay stable, but resolve
//! to nothing here.

use crate::auth::wallet::WalletAuthenticator;
use std::collections::HashMap;
use std::sync::Arc;

/// The known authentication strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthStrategy {
    // ---
    Form,
    OAuthGithub,
    OAuthGoogle,
    WalletSignature,
}

impl AuthStrategy {
    // ---
    /// Parse a strategy from its URL path tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        // ---
        match tag {
            "form" => Some(AuthStrategy::Form),
            "github" => Some(AuthStrategy::OAuthGithub),
            "google" => Some(AuthStrategy::OAuthGoogle),
            "wallet" => Some(AuthStrategy::WalletSignature),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        // ---
        match self {
            AuthStrategy::Form => "form",
            AuthStrategy::OAuthGithub => "github",
            AuthStrategy::OAuthGoogle => "google",
            AuthStrategy::WalletSignature => "wallet",
        }
    }
}

/// A registered authenticator capability.
///
/// Form and OAuth strategies would add variants here; this service only
/// provides wallet signature authentication.
#[derive(Clone)]
pub enum Authenticator {
    // ---
    WalletSignature(Arc<WalletAuthenticator>),
}

/// Explicit strategy registry, constructed once at process start.
#[derive(Clone, Default)]
pub struct AuthRegistry {
    // ---
    strategies: HashMap<AuthStrategy, Authenticator>,
}

impl AuthRegistry {
    // ---
    pub fn new() -> Self {
        // ---
        Self::default()
    }

    /// Register an authenticator under a strategy tag. Later
    /// registrations for the same strategy replace earlier ones.
    pub fn register(mut self, strategy: AuthStrategy, authenticator: Authenticator) -> Self {
        // ---
        self.strategies.insert(strategy, authenticator);
        self
    }

    /// Look up the authenticator for a strategy, if one is registered.
    pub fn get(&self, strategy: AuthStrategy) -> Option<&Authenticator> {
        // ---
        self.strategies.get(&strategy)
    }

    /// The wallet authenticator, if registered.
    pub fn wallet(&self, strategy: AuthStrategy) -> Option<&WalletAuthenticator> {
        // ---
        match self.get(strategy) {
            Some(Authenticator::WalletSignature(wallet)) => Some(wallet.as_ref()),
            None => None,
        }
    }
}
