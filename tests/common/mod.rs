// Test helpers are intentionally partially used
#![allow(dead_code)]

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use ed25519_dalek::{Signer, SigningKey};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tower::ServiceExt;
use uuid::Uuid;

use wallet_auth::auth::{AuthRegistry, AuthStrategy, Authenticator, WalletAuthenticator};
use wallet_auth::domain::{
    generate_nonce_value, CreateUserError, Metrics, MetricsPtr, NewUser, NonceStore, NonceTake,
    Repository, SessionInfo, SessionStore, User,
};
use wallet_auth::{app_router, create_noop_metrics, AppState};

// ============================================================================
// In-memory backends
// ============================================================================

/// In-memory nonce store with the same semantics as the Redis one:
/// atomic take, expiry classified from the stored creation time.
pub struct MemoryNonceStore {
    // ---
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
    ttl: ChronoDuration,
}

impl MemoryNonceStore {
    // ---
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(HashMap::new()),
            ttl: ChronoDuration::minutes(5),
        })
    }

    /// Rewind a nonce's creation time to simulate age.
    pub fn backdate(&self, value: &str, age: ChronoDuration) {
        // ---
        let mut entries = self.entries.lock().unwrap();
        if let Some(created_at) = entries.get_mut(value) {
            *created_at = Utc::now() - age;
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        // ---
        self.entries.lock().unwrap().contains_key(value)
    }
}

#[async_trait::async_trait]
impl NonceStore for MemoryNonceStore {
    // ---
    async fn issue(&self) -> Result<String> {
        let value = generate_nonce_value();
        self.entries.lock().unwrap().insert(value.clone(), Utc::now());
        Ok(value)
    }

    async fn take(&self, value: &str) -> Result<NonceTake> {
        let created_at = match self.entries.lock().unwrap().remove(value) {
            Some(t) => t,
            None => return Ok(NonceTake::NotFound),
        };
        if Utc::now() - created_at > self.ttl {
            return Ok(NonceTake::Expired);
        }
        Ok(NonceTake::Fresh)
    }
}

/// In-memory repository enforcing the same unique constraints as the
/// users table.
#[derive(Default)]
pub struct MemoryRepository {
    // ---
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryRepository {
    // ---
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Fetch a user that is expected to exist.
    pub fn get_user(&self, id: Uuid) -> User {
        // ---
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .expect("user should exist")
    }
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    // ---
    async fn create_user(&self, new_user: NewUser) -> Result<User, CreateUserError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == new_user.username) {
            return Err(CreateUserError::UsernameTaken);
        }
        if users.values().any(|u| u.wallet_address == new_user.wallet_address) {
            return Err(CreateUserError::WalletTaken);
        }
        let user = User::new(new_user);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_wallet(&self, wallet_address: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.wallet_address == wallet_address)
            .cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }
}

/// In-memory session store: token -> user id.
#[derive(Default)]
pub struct MemorySessionStore {
    // ---
    sessions: Mutex<HashMap<String, Uuid>>,
}

impl MemorySessionStore {
    // ---
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Resolve a token to its user id, if the session exists.
    pub fn lookup(&self, token: &str) -> Option<Uuid> {
        // ---
        self.sessions.lock().unwrap().get(token).copied()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    // ---
    async fn create(&self, user_id: Uuid) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        self.sessions.lock().unwrap().insert(token.clone(), user_id);
        Ok(token)
    }

    async fn validate(&self, token: &str) -> Result<Option<SessionInfo>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(token)
            .map(|&user_id| SessionInfo { user_id }))
    }
}

/// Metrics double that counts recorded events, for asserting what the
/// handlers observe.
#[derive(Default)]
pub struct RecordingMetrics {
    // ---
    pub challenges: AtomicUsize,
    pub logins: Mutex<Vec<String>>,
    pub http_requests: AtomicUsize,
}

impl Metrics for RecordingMetrics {
    // ---
    fn render(&self) -> String {
        String::new()
    }

    fn record_challenge_issued(&self) {
        self.challenges.fetch_add(1, Ordering::SeqCst);
    }

    fn record_login(&self, outcome: &str) {
        self.logins.lock().unwrap().push(outcome.to_string());
    }

    fn record_http_request(&self, _start: Instant, _path: &str, _method: &str, _status: u16) {
        self.http_requests.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Test application
// ============================================================================

pub struct TestApp {
    // ---
    pub router: Router,
    pub nonces: Arc<MemoryNonceStore>,
    pub repo: Arc<MemoryRepository>,
    pub sessions: Arc<MemorySessionStore>,
}

impl TestApp {
    // ---
    /// Build the real router over in-memory backends.
    pub fn new() -> Self {
        // ---
        Self::with_metrics(create_noop_metrics().expect("noop metrics"))
    }

    /// Build the real router with a caller-supplied metrics backend.
    pub fn with_metrics(metrics: MetricsPtr) -> Self {
        // ---
        let nonces = MemoryNonceStore::new();
        let repo = Arc::new(MemoryRepository::default());
        let sessions = Arc::new(MemorySessionStore::default());

        let wallet = Arc::new(WalletAuthenticator::new(nonces.clone(), repo.clone()));
        let registry = AuthRegistry::new().register(
            AuthStrategy::WalletSignature,
            Authenticator::WalletSignature(wallet),
        );

        let state = AppState::new(
            repo.clone(),
            nonces.clone(),
            sessions.clone(),
            metrics,
            registry,
        );

        Self {
            router: app_router(state),
            nonces,
            repo,
            sessions,
        }
    }

    pub async fn post_json(&self, path: &str, body: Value) -> Response<Body> {
        // ---
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, path: &str) -> Response<Body> {
        // ---
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Request a wallet challenge, asserting success.
    pub async fn challenge(&self) -> (String, String) {
        // ---
        let response = self.post_json("/auth/wallet/challenge", json!({})).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        let nonce = body["nonce"].as_str().expect("nonce field").to_string();
        let message = body["message"].as_str().expect("message field").to_string();
        (nonce, message)
    }
}

// ============================================================================
// Wallet-side helpers
// ============================================================================

/// A test wallet: Ed25519 keypair with base58 encodings.
pub struct TestWallet {
    // ---
    signing_key: SigningKey,
}

impl TestWallet {
    // ---
    pub fn new() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    pub fn public_key_b58(&self) -> String {
        // ---
        bs58::encode(self.signing_key.verifying_key().to_bytes()).into_string()
    }

    pub fn sign_b58(&self, message: &str) -> String {
        // ---
        let signature = self.signing_key.sign(message.as_bytes());
        bs58::encode(signature.to_bytes()).into_string()
    }

    /// Build the full login body for a challenge.
    pub fn login_body(&self, nonce: &str, message: &str) -> Value {
        // ---
        json!({
            "public_key": self.public_key_b58(),
            "signature": self.sign_b58(message),
            "message": message,
            "nonce": nonce,
        })
    }
}

/// Drain a response body into JSON.
pub async fn read_json(response: Response<Body>) -> Value {
    // ---
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Drain a response body into a string.
pub async fn read_text(response: Response<Body>) -> String {
    // ---
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}
