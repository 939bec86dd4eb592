//! Sentigate - ML inference API behind JWT authentication and RBAC

use anyhow::{Context, Result};
use dotenv::dotenv;
use sentigate_backend::{
    api::{build_router, AppState},
    auth::{AuthGateway, PasswordHasher, TokenService, UserStore},
    config::{Config, APP_NAME},
    ml::LexiconModel,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    let _ = dotenv();
    init_tracing();

    let config = Config::from_env();

    info!("🚀 {APP_NAME} starting");

    // Auth core: hasher, bootstrap store, token service, gateway. All state
    // is built here and injected; request handlers never touch globals.
    let hasher = PasswordHasher::new(config.bcrypt_cost);
    let store = Arc::new(
        UserStore::bootstrap(&hasher).context("Failed to seed bootstrap users")?,
    );
    let tokens = Arc::new(TokenService::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl_secs,
    ));
    let gateway = AuthGateway::new(store, tokens, hasher);

    info!(
        "🔐 Authentication initialized (token TTL: {}s, bcrypt cost: {})",
        config.token_ttl_secs, config.bcrypt_cost
    );

    let model = Arc::new(LexiconModel::new(config.model_name.clone()));
    info!("🧠 Model ready: {}", config.model_name);

    let state = AppState {
        gateway,
        model,
        app_name: APP_NAME.to_string(),
    };
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {addr}");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentigate_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
