use anyhow::Result;
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber to log to stdout
    tracing_subscriber::fmt::try_init().ok();
    info!("Starting Wallet Auth API server v{}...", env!("CARGO_PKG_VERSION"));

    // Bring the database up before the router: the pool is global and
    // the repository factory expects it to exist.
    wallet_auth::domain::init_database_with_retry_from_env().await?;

    let app = wallet_auth::create_router()?;

    // Get optional bind endpoint from environment
    let endpoint = env::var("API_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    info!("Starting at endpoint:{}", endpoint);

    let listener = tokio::net::TcpListener::bind(&endpoint).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
