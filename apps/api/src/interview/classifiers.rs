//! Response classifiers: LLM-backed checks turned into closed `Verdict` enums.
//!
//! Each check is split into a pure parser over the model's free text and an
//! async wrapper that owns the backend call and its fallback. Backend failures
//! never block the candidate: the monitor falls back to `Acceptable`, the
//! completeness judge to `Complete`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::interview::prompts::{
    clarify_prompt, completeness_prompt, monitor_prompt, COMPLETE_MARKER, INAPPROPRIATE_MARKER,
};
use crate::llm_client::{AgentRole, GenerationBackend};

/// Surfaced when the monitor flags a response but gives no reason.
pub const DEFAULT_TERMINATION_REASON: &str =
    "Repeated unprofessional communication was detected.";

const MONITOR_TEMPERATURE: f32 = 0.1;
const CLARIFICATION_TEMPERATURE: f32 = 0.6;

/// Phrases that mean the candidate did not understand the question.
const CONFUSION_MARKERS: &[&str] = &[
    "i don't understand",
    "can you explain",
    "not sure",
    "what do you mean",
    "confused",
    "unclear",
    "can you clarify",
    "don't know what",
    "?",
];

static COMPLETE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b{}\b", regex::escape(COMPLETE_MARKER))).unwrap()
});

static INTERROGATIVE_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:To help|I would|Let me|Could you|What|How|Why|Can you|Tell me|Describe|Explain).*\?",
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum AppropriatenessVerdict {
    Acceptable,
    Inappropriate { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "prompt", rename_all = "snake_case")]
pub enum ClarificationVerdict {
    Complete,
    NeedsClarification(String),
    NeedsFollowUp(String),
}

impl ClarificationVerdict {
    /// The text to show the candidate, if the answer was not accepted as is.
    pub fn prompt(&self) -> Option<&str> {
        match self {
            ClarificationVerdict::Complete => None,
            ClarificationVerdict::NeedsClarification(p) | ClarificationVerdict::NeedsFollowUp(p) => {
                Some(p)
            }
        }
    }
}

/// Pulls the follow-up question out of a completeness judge's reply.
pub trait FollowUpExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Option<String>;
}

/// First clause that opens with an interrogative phrase and ends in `?`.
pub struct InterrogativeClauseExtractor;

impl FollowUpExtractor for InterrogativeClauseExtractor {
    fn extract(&self, text: &str) -> Option<String> {
        INTERROGATIVE_CLAUSE
            .find(text)
            .map(|m| m.as_str().to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsers
// ────────────────────────────────────────────────────────────────────────────

/// Anything without the violation marker is acceptable.
pub fn parse_appropriateness(text: &str) -> AppropriatenessVerdict {
    let Some(idx) = text.find(INAPPROPRIATE_MARKER) else {
        return AppropriatenessVerdict::Acceptable;
    };
    let reason = text[idx + INAPPROPRIATE_MARKER.len()..]
        .trim()
        .trim_matches('"')
        .trim();
    let reason = if reason.is_empty() {
        DEFAULT_TERMINATION_REASON.to_string()
    } else {
        reason.to_string()
    };
    AppropriatenessVerdict::Inappropriate { reason }
}

/// `COMPLETE` (as a standalone word) or an empty reply means complete;
/// anything else is a follow-up.
pub fn parse_completeness(text: &str, extractor: &dyn FollowUpExtractor) -> ClarificationVerdict {
    let text = text.trim();
    if text.is_empty() || COMPLETE_TOKEN.is_match(text) {
        return ClarificationVerdict::Complete;
    }
    let follow_up = extractor
        .extract(text)
        .unwrap_or_else(|| text.to_string());
    ClarificationVerdict::NeedsFollowUp(follow_up)
}

pub fn shows_confusion(answer: &str) -> bool {
    let lower = answer.to_lowercase();
    CONFUSION_MARKERS.iter().any(|m| lower.contains(m))
}

// ────────────────────────────────────────────────────────────────────────────
// Backend-calling checks
// ────────────────────────────────────────────────────────────────────────────

/// Runs the conduct monitor. Backend failure → `Acceptable`.
pub async fn check_appropriateness(
    llm: &dyn GenerationBackend,
    answer: &str,
) -> AppropriatenessVerdict {
    match llm
        .generate(AgentRole::Technical, &monitor_prompt(answer), MONITOR_TEMPERATURE)
        .await
    {
        Ok(text) => parse_appropriateness(&text),
        Err(e) => {
            warn!("Appropriateness check failed, treating response as acceptable: {e}");
            AppropriatenessVerdict::Acceptable
        }
    }
}

/// Decides whether an answer needs a clarification or follow-up round.
///
/// Confusion markers short-circuit to a re-explanation; otherwise the model
/// judges completeness. Backend failure → `Complete`.
pub async fn evaluate_response(
    llm: &dyn GenerationBackend,
    extractor: &dyn FollowUpExtractor,
    question: &str,
    answer: &str,
    resume_data: &str,
) -> ClarificationVerdict {
    if shows_confusion(answer) {
        let prompt = clarify_prompt(question, answer, resume_data);
        return match llm
            .generate(AgentRole::Clarification, &prompt, CLARIFICATION_TEMPERATURE)
            .await
        {
            Ok(text) if !text.trim().is_empty() => {
                ClarificationVerdict::NeedsClarification(text.trim().to_string())
            }
            Ok(_) => ClarificationVerdict::Complete,
            Err(e) => {
                warn!("Clarification request failed, moving on: {e}");
                ClarificationVerdict::Complete
            }
        };
    }

    let prompt = completeness_prompt(question, answer, resume_data);
    match llm
        .generate(AgentRole::Clarification, &prompt, CLARIFICATION_TEMPERATURE)
        .await
    {
        Ok(text) => parse_completeness(&text, extractor),
        Err(e) => {
            warn!("Completeness check failed, treating answer as complete: {e}");
            ClarificationVerdict::Complete
        }
    }
}
