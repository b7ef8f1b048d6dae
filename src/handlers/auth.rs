//! Wallet authentication handlers.
//!
//! Implements the two-phase wallet login flow:
//! 1. `challenge` - Issue a single-use nonce and the message to sign
//! 2. `login` - Verify the signed credential and create a session token
//!
//! Both routes are parameterized by strategy tag so the URL space stays
//! stable as other strategies (form, OAuth) come and go; requests for a
//! strategy this service does not register are rejected up front.

use crate::app_state::AppState;
use crate::auth::{AuthError, AuthStrategy, WalletAuthenticator, WalletCredential};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::time::Instant;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    //
    pub nonce: String,
    /// The exact text the wallet must sign. Derived from the nonce; the
    /// server re-derives it at verification and compares.
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    //
    pub id: String,
    pub session_token: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    //
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    // ---
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Resolve the wallet authenticator for a strategy path tag.
fn resolve_wallet<'a>(
    state: &'a AppState,
    tag: &str,
) -> Result<&'a WalletAuthenticator, (StatusCode, Json<ErrorResponse>)> {
    // ---
    let strategy = AuthStrategy::from_tag(tag).ok_or_else(|| {
        tracing::warn!("Unknown authentication strategy requested: {tag}");
        error_response(StatusCode::BAD_REQUEST, "Unsupported authentication strategy")
    })?;

    state.auth().wallet(strategy).ok_or_else(|| {
        tracing::warn!("Strategy '{tag}' is not registered with this service");
        error_response(StatusCode::BAD_REQUEST, "Unsupported authentication strategy")
    })
}

// ============================================================================
// Challenge Handler
// ============================================================================

/// POST /auth/{strategy}/challenge
///
/// Issues a single-use nonce and returns it together with the challenge
/// message the wallet must sign. The nonce stays valid for the configured
/// freshness window (5 minutes by default) and is deleted the first time
/// it is submitted, whatever the outcome of that submission.
#[tracing::instrument(skip(state))]
pub async fn challenge(
    State(state): State<AppState>,
    Path(strategy): Path<String>,
) -> Result<Json<ChallengeResponse>, (StatusCode, Json<ErrorResponse>)> {
    //
    let start = Instant::now();
    let wallet = resolve_wallet(&state, &strategy)?;

    let challenge = match wallet.issue_challenge().await {
        Ok(challenge) => challenge,
        Err(e) => {
            //
            tracing::error!("Failed to issue challenge: {e:?}");
            state.metrics().record_http_request(
                start,
                "/auth/challenge",
                "POST",
                StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            );
            return Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ));
        }
    };

    state.metrics().record_challenge_issued();
    state
        .metrics()
        .record_http_request(start, "/auth/challenge", "POST", StatusCode::OK.as_u16());
    tracing::info!("Issued wallet challenge");

    Ok(Json(ChallengeResponse {
        nonce: challenge.nonce,
        message: challenge.message,
    }))
}

// ============================================================================
// Login Handler
// ============================================================================

/// POST /auth/{strategy}/login
///
/// Completes wallet authentication: takes the nonce out of the store,
/// verifies the Ed25519 signature over the recomputed challenge message,
/// provisions the user on first login, and returns the identity id plus a
/// session token.
///
/// # Security
/// - The nonce is consumed atomically before the signature is examined
/// - The client-echoed message is never trusted; it is recomputed from
///   the nonce server-side
/// - All failures map to fixed messages; no internal detail leaks
#[tracing::instrument(skip(state, credential))]
pub async fn login(
    State(state): State<AppState>,
    Path(strategy): Path<String>,
    Json(credential): Json<WalletCredential>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    //
    let start = Instant::now();
    let wallet = resolve_wallet(&state, &strategy)?;

    let session = match wallet.authenticate(credential).await {
        Ok(session) => session,
        Err(e) => {
            //
            state.metrics().record_login(e.outcome_label());
            let status = e.status();
            state
                .metrics()
                .record_http_request(start, "/auth/login", "POST", status.as_u16());

            match e {
                AuthError::Storage(_) => tracing::error!("Login failed on storage: {e:?}"),
                _ => tracing::warn!("Login rejected: {e}"),
            }

            return Err(error_response(status, e.client_message()));
        }
    };

    let session_token = state.sessions().create(session.id).await.map_err(|e| {
        //
        tracing::error!("Failed to create session for user {}: {e:?}", session.id);
        state.metrics().record_login("storage_error");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    })?;

    state.metrics().record_login("success");
    state
        .metrics()
        .record_http_request(start, "/auth/login", "POST", StatusCode::OK.as_u16());

    tracing::info!("User {} authenticated via wallet signature", session.id);

    Ok(Json(LoginResponse {
        id: session.id.to_string(),
        session_token,
    }))
}
