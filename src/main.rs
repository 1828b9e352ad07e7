/// Chorus: multi-assistant workflow engine
///
/// Main entry point for the Chorus server. Initializes configuration from the
/// environment and starts the HTTP server.

use chorus::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Assistant management at /api/assistants/*
/// - Workflow and draft management at /api/workflows/* and /api/draft/*
/// - Chat submission and history at /api/chat/*
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // CHORUS_* environment variables override the defaults (0.0.0.0:7860, ./data)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
