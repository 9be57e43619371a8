use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
/// One week.
const MAX_SESSION_TTL_MINUTES: u32 = 7 * 24 * 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub anthropic_api_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Idle sessions older than this are swept from memory.
    pub session_ttl_minutes: u32,
    pub llm_timeout_secs: u64,
    /// Transport-level attempts per LLM call (429 / 5xx only).
    pub llm_max_attempts: u32,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            anthropic_api_url: std::env::var("ANTHROPIC_API_URL")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_API_URL.to_string()),
            port: parse_or_default("PORT", std::env::var("PORT").ok(), 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session_ttl_minutes: parse_session_ttl(std::env::var("SESSION_TTL_MINUTES").ok())?,
            llm_timeout_secs: parse_or_default(
                "LLM_TIMEOUT_SECS",
                std::env::var("LLM_TIMEOUT_SECS").ok(),
                120,
            )?,
            llm_max_attempts: parse_or_default(
                "LLM_MAX_ATTEMPTS",
                std::env::var("LLM_MAX_ATTEMPTS").ok(),
                3,
            )?,
            max_upload_bytes: parse_or_default(
                "MAX_UPLOAD_BYTES",
                std::env::var("MAX_UPLOAD_BYTES").ok(),
                10 * 1024 * 1024,
            )?,
        })
    }
}

impl Config {
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.session_ttl_minutes))
    }
}

fn parse_session_ttl(raw: Option<String>) -> Result<u32> {
    let minutes: u32 = parse_or_default("SESSION_TTL_MINUTES", raw, 60)?;
    if !(1..=MAX_SESSION_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!(
            "SESSION_TTL_MINUTES must be between 1 and {MAX_SESSION_TTL_MINUTES}, got {minutes}"
        );
    }
    Ok(minutes)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Parses an optional raw value, falling back to `default` when unset.
fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            anthropic_api_key: "test-key".to_string(),
            anthropic_api_url: DEFAULT_ANTHROPIC_API_URL.to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            session_ttl_minutes: 60,
            llm_timeout_secs: 5,
            llm_max_attempts: 1,
            max_upload_bytes: 1024 * 1024,
        }
    }
}
