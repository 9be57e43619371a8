//! Resume Store: chunked resume text keyed by session, ranked by embedding
//! similarity at retrieval time.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::resume::embedding::{cosine_similarity, Embedder, HashingEmbedder};
use crate::resume::ingest::extract_candidate_name;

/// Window size, in characters, of each stored chunk.
pub const CHUNK_SIZE: usize = 512;
/// Number of chunks concatenated into a retrieval result.
pub const TOP_K: usize = 3;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Embedding failed: {0}")]
    Embedding(String),
}

/// Retrieval capability consumed by the interview orchestrator.
///
/// Reads and writes for different session ids never interfere.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Chunks and stores `text` for `session_id`, returning the extracted
    /// candidate name.
    async fn store(&self, text: &str, session_id: Uuid) -> Result<String, StoreError>;

    /// Concatenation of the nearest chunks to `query` for `session_id`.
    async fn retrieve(&self, session_id: Uuid, query: &str) -> Result<String, StoreError>;

    async fn remove(&self, session_id: Uuid);
}

#[derive(Debug, Clone)]
struct ResumeChunk {
    id: String,
    text: String,
    embedding: Vec<f32>,
}

pub struct InMemoryResumeStore {
    embedder: Arc<dyn Embedder>,
    chunks: RwLock<HashMap<Uuid, Vec<ResumeChunk>>>,
}

impl InMemoryResumeStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            chunks: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryResumeStore {
    fn default() -> Self {
        Self::new(Arc::new(HashingEmbedder::default()))
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn store(&self, text: &str, session_id: Uuid) -> Result<String, StoreError> {
        let records: Vec<ResumeChunk> = chunk_text(text, CHUNK_SIZE)
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| ResumeChunk {
                id: format!("{session_id}-{i}"),
                embedding: self.embedder.embed(&chunk),
                text: chunk,
            })
            .collect();

        debug!("Stored {} resume chunks for session {}", records.len(), session_id);
        self.chunks.write().await.insert(session_id, records);

        Ok(extract_candidate_name(text))
    }

    async fn retrieve(&self, session_id: Uuid, query: &str) -> Result<String, StoreError> {
        let query_embedding = self.embedder.embed(query);
        let guard = self.chunks.read().await;
        let Some(records) = guard.get(&session_id) else {
            return Ok(String::new());
        };

        if let Some(r) = records
            .iter()
            .find(|r| r.embedding.len() != query_embedding.len())
        {
            return Err(StoreError::Embedding(format!(
                "chunk {} has {} dimensions, query has {}",
                r.id,
                r.embedding.len(),
                query_embedding.len()
            )));
        }

        let mut ranked: Vec<(f32, &ResumeChunk)> = records
            .iter()
            .map(|r| (cosine_similarity(&query_embedding, &r.embedding), r))
            .collect();
        // Stable sort keeps document order among equal scores.
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let selected: Vec<&str> = ranked
            .iter()
            .take(TOP_K)
            .map(|(_, r)| r.text.as_str())
            .collect();
        debug!(
            "Retrieved chunks {:?} for session {}",
            ranked.iter().take(TOP_K).map(|(_, r)| r.id.as_str()).collect::<Vec<_>>(),
            session_id
        );
        Ok(selected.join("\n"))
    }

    async fn remove(&self, session_id: Uuid) {
        self.chunks.write().await.remove(&session_id);
    }
}

/// Splits text into windows of `size` characters. Never splits a code point.
pub fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size.max(1))
        .map(|c| c.iter().collect())
        .collect()
}
