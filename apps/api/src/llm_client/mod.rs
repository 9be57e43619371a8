//! Text generation for the interview agents.
//!
//! Interview logic only sees the `GenerationBackend` trait. `LlmClient` is the
//! Anthropic Messages API implementation and the only code that talks HTTP.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use prompts::{
    CLARIFICATION_AGENT_SYSTEM, GREETING_AGENT_SYSTEM, REPORT_AGENT_SYSTEM,
    TECHNICAL_AGENT_SYSTEM,
};

const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";
/// Interview turns are short; the report is the longest output.
const MAX_TOKENS: u32 = 800;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Selects the fixed system instruction sent with a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Greeting,
    Technical,
    Clarification,
    Report,
}

impl AgentRole {
    pub fn system_prompt(self) -> &'static str {
        match self {
            AgentRole::Greeting => GREETING_AGENT_SYSTEM,
            AgentRole::Technical => TECHNICAL_AGENT_SYSTEM,
            AgentRole::Clarification => CLARIFICATION_AGENT_SYSTEM,
            AgentRole::Report => REPORT_AGENT_SYSTEM,
        }
    }
}

/// Stateless prompt-in / text-out completion.
///
/// Carried in `AppState` as `Arc<dyn GenerationBackend>` so tests can swap in
/// a scripted backend without touching the orchestrator.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(
        &self,
        role: AgentRole,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first non-blank text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .find(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API with transport retries on 429 / 5xx.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    max_attempts: u32,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        api_url: String,
        timeout: Duration,
        max_attempts: u32,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_url,
            max_attempts: max_attempts.max(1),
        })
    }

    /// Sends one Messages API request, retrying transient failures
    /// (transport errors, 429, 5xx) up to `max_attempts` times.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        temperature: f32,
    ) -> Result<LlmResponse, GenerationError> {
        let request_body = build_request(prompt, system, temperature);
        let mut attempt = 1;

        loop {
            let err = match self.send_once(&request_body).await {
                Attempt::Done(response) => {
                    debug!(
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        "LLM call succeeded"
                    );
                    return Ok(response);
                }
                Attempt::Fatal(err) => return Err(err),
                Attempt::Transient(err) => err,
            };

            if attempt >= self.max_attempts {
                return Err(exhausted(err, attempt - 1));
            }

            let delay = backoff_delay(attempt);
            attempt += 1;
            warn!("Retrying LLM call (attempt {attempt}) in {}ms: {err}", delay.as_millis());
            tokio::time::sleep(delay).await;
        }
    }

    async fn send_once(&self, body: &AnthropicRequest<'_>) -> Attempt {
        let sent = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await;
        let response = match sent {
            Ok(response) => response,
            Err(e) => return Attempt::Transient(GenerationError::Http(e)),
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<LlmResponse>().await {
                Ok(parsed) => Attempt::Done(parsed),
                Err(e) => Attempt::Fatal(GenerationError::Http(e)),
            };
        }

        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AnthropicError>(&raw)
            .map(|e| e.error.message)
            .unwrap_or(raw);
        let err = GenerationError::Api {
            status: status.as_u16(),
            message,
        };
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            warn!("LLM API returned {status}");
            Attempt::Transient(err)
        } else {
            Attempt::Fatal(err)
        }
    }
}

enum Attempt {
    Done(LlmResponse),
    Transient(GenerationError),
    Fatal(GenerationError),
}

/// Final error once every attempt failed. A run that ends on 429 reports
/// how many retries it made.
fn exhausted(err: GenerationError, retries: u32) -> GenerationError {
    match err {
        GenerationError::Api { status: 429, .. } => GenerationError::RateLimited { retries },
        other => other,
    }
}

/// 1s, 2s, 4s, ... capped at 16s.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1 << (attempt - 1).min(4))
}

#[async_trait]
impl GenerationBackend for LlmClient {
    async fn generate(
        &self,
        role: AgentRole,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        let response = self.call(prompt, role.system_prompt(), temperature).await?;
        response
            .text()
            .map(|t| t.trim().to_string())
            .ok_or(GenerationError::EmptyContent)
    }
}

fn build_request<'a>(prompt: &'a str, system: &'a str, temperature: f32) -> AnthropicRequest<'a> {
    AnthropicRequest {
        model: MODEL,
        max_tokens: MAX_TOKENS,
        temperature: temperature.clamp(0.0, 1.0),
        system,
        messages: vec![AnthropicMessage {
            role: "user",
            content: prompt,
        }],
    }
}
