use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the Wallet Auth API 👋
Version: {version}

Available endpoints:
  - POST /auth/wallet/challenge - Issue a single-use login nonce
  - POST /auth/wallet/login     - Verify a signed challenge, get a session
  - GET  /health                - Light health check
  - GET  /health?mode=full      - Full health check (includes session store)
  - GET  /metrics               - Prometheus metrics

Wallet login is a challenge-response flow: request a challenge, sign the
returned message with your wallet key (Ed25519), then submit the base58
public key and signature together with the nonce.
"#
    )
}
