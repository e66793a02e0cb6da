#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Context;
use kisan_server::{ApiKeyManager, ProxyState, ServerConfig, build_router};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,kisan_server=debug,kisan_ai=debug".into());

    if std::env::var("KISAN_LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_line_number(true)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting Kisan Mitra chat proxy");

    let config = ServerConfig::load()?;
    tracing::debug!(?config, "Loaded configuration");

    let state = ProxyState::from_config(&config)?;
    if !state.upstream.has_api_key() {
        tracing::warn!("KISAN_UPSTREAM_API_KEY is not set; /chat requests will fail");
    }

    let keys = ApiKeyManager::from_settings(&config.auth);
    if !keys.is_enabled() {
        tracing::warn!("No proxy credentials configured; /chat accepts any caller");
    }

    let app = build_router(Arc::new(state), keys);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!(model = %config.upstream.model, "Kisan Mitra running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")
}
