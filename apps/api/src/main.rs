mod config;
mod errors;
mod interview;
mod llm_client;
mod resume;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::orchestrator::Orchestrator;
use crate::interview::sessions::SessionStore;
use crate::llm_client::LlmClient;
use crate::resume::store::{InMemoryResumeStore, ResumeStore};
use crate::routes::build_router;
use crate::state::AppState;

/// How often idle sessions are swept.
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interviewer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.anthropic_api_url.clone(),
        Duration::from_secs(config.llm_timeout_secs),
        config.llm_max_attempts,
    )?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Resume store (in-memory chunks with hashed embeddings)
    let resumes: Arc<dyn ResumeStore> = Arc::new(InMemoryResumeStore::default());

    let sessions = Arc::new(SessionStore::new());
    let orchestrator = Arc::new(Orchestrator::new(Arc::new(llm), resumes.clone()));

    spawn_session_purge(
        sessions.clone(),
        resumes.clone(),
        config.session_ttl(),
    );

    // Build app state
    let state = AppState {
        sessions,
        resumes,
        orchestrator,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS once the frontend origin is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Drops idle sessions and their resume chunks on a fixed interval.
fn spawn_session_purge(
    sessions: Arc<SessionStore>,
    resumes: Arc<dyn ResumeStore>,
    ttl: chrono::Duration,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            for id in sessions.purge_expired(ttl).await {
                resumes.remove(id).await;
            }
        }
    });
}
