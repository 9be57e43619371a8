use std::sync::Arc;

use crate::config::Config;
use crate::interview::orchestrator::Orchestrator;
use crate::interview::sessions::SessionStore;
use crate::resume::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    /// Pluggable resume store. Default: in-memory chunks with hashed embeddings.
    pub resumes: Arc<dyn ResumeStore>,
    pub orchestrator: Arc<Orchestrator>,
    pub config: Config,
}
