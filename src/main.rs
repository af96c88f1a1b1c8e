//! Research Agent - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the research UI.

use research_agent::{api, config::Config};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "research_agent=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    if config.is_ready() {
        info!("Loaded configuration: model={}", config.model);
    } else {
        // Missing secrets switch the UI into setup mode; the server still runs.
        warn!("GOOGLE_API_KEY and/or TAVILY_API_KEY not found; serving setup page only");
    }

    // Start HTTP server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting server on {}", addr);

    api::serve(config).await?;

    Ok(())
}
