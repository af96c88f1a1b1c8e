//! HTTP API: the research page, the research endpoint, and health.

mod page;
mod research;
pub mod types;

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::agent::{Agent, ResearchInvoker};
use crate::config::Config;

use types::HealthResponse;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Present only when both credentials were found at startup
    pub invoker: Option<Arc<dyn ResearchInvoker>>,

    /// Serializes research runs to one in-flight request at a time
    pub run_gate: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let invoker = config
            .secrets
            .as_ref()
            .map(|secrets| Arc::new(Agent::new(&config, secrets)) as Arc<dyn ResearchInvoker>);

        Self {
            config: Arc::new(config),
            invoker,
            run_gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/health", get(health))
        .route("/api/research", post(research::research))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server and run until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ready: state.config.is_ready(),
    })
}
