/// Server setup and initialization
///
/// Wires together all components: data directory, assistant and workflow stores,
/// execution engine, and HTTP routes. Provides the main application factory
/// function for creating the Axum app.

use crate::{
    api::{create_api_routes, AppState},
    config::Config,
    session::ChatSession,
};
use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Create the main Axum application with all routes
///
/// Loads both stores from the data directory and, when an API key is configured,
/// initializes the completion backend up front.
pub async fn create_app(config: Config) -> Result<Router> {
    tracing::info!("📁 Ensuring data directory exists: {}", config.storage.data_dir.display());
    std::fs::create_dir_all(config.storage.conversation_dir())
        .map_err(|e| anyhow::anyhow!("Failed to create data directory: {}", e))?;

    tracing::info!("📋 Loading assistants and workflows");
    let session = Arc::new(ChatSession::open(&config));

    if let Some(api_key) = &config.completion.api_key {
        tracing::info!("🔑 API key found in environment, initializing backend");
        if let Err(e) = session.initialize(api_key, None) {
            tracing::warn!("⚠️ Backend not initialized: {}", e);
        }
    }

    let app = build_router(session);
    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Build the HTTP router around an existing session
pub fn build_router(session: Arc<ChatSession>) -> Router {
    tracing::debug!("📡 Creating HTTP router with all endpoints");
    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Assistant, workflow and chat API routes
        .merge(create_api_routes().with_state(AppState { session }))
}

/// Start the HTTP server with the given configuration
///
/// Creates the application and starts the Axum server on the configured address and port.
pub async fn start_server(config: Config) -> Result<()> {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Chorus server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
