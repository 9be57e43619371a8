//! Report Synthesizer: one LLM call after the last answer, parsed
//! deterministically into per-exchange feedback and study topics.
//!
//! Parsing:
//! 1. strip markdown-style markup
//! 2. collect `CORRECT:` and `IMPROVE:` segments, each running to the next
//!    marker of either kind (or end of text)
//! 3. zip segments with exchanges by position
//! 4. split the `RECOMMENDED TOPICS:` tail into topics
//!
//! Alignment is positional, not content-matched: if the model emits a
//! different number of segments than there are exchanges, trailing exchanges
//! get no notes and surplus segments are dropped.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::interview::models::Exchange;
use crate::interview::prompts::{
    report_prompt, IMPROVEMENT_MARKER, STRENGTH_MARKER, TOPICS_MARKER,
};
use crate::llm_client::{AgentRole, GenerationBackend};

const REPORT_TEMPERATURE: f32 = 0.7;
/// Topics shorter than this many characters are dropped.
const MIN_TOPIC_CHARS: usize = 4;

/// Ordered cleanup passes: (pattern, replacement).
static MARKDOWN_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        // bold, then italic
        (Regex::new(r"\*\*(.*?)\*\*").unwrap(), "${1}"),
        (Regex::new(r"\*(.*?)\*").unwrap(), "${1}"),
        // code spans
        (Regex::new(r"`(.*?)`").unwrap(), "${1}"),
        // links keep their label
        (Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap(), "${1}"),
        (Regex::new(r"(?m)^#+\s+").unwrap(), ""),
        (Regex::new(r"(?m)^>\s+").unwrap(), ""),
        // horizontal rules
        (Regex::new(r"(?m)^\s*[-*_]{3,}\s*$").unwrap(), ""),
        (Regex::new(r"(?m)^\s*[-*+]\s+").unwrap(), "• "),
        (Regex::new(r"(?m)^\s*\d+\.\s+").unwrap(), ""),
    ]
});

static NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\s+").unwrap());

/// Feedback attached to one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeFeedback {
    pub question: String,
    pub answer: String,
    pub clarification_prompt: Option<String>,
    pub clarification_answer: Option<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// Qualitative closing report. Never scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub exchanges: Vec<ExchangeFeedback>,
    pub topics: Vec<String>,
}

impl Report {
    /// Report with the transcript but no annotations.
    pub fn unannotated(exchanges: &[Exchange]) -> Self {
        Report {
            exchanges: exchanges.iter().map(|e| feedback_for(e, None, None)).collect(),
            topics: Vec::new(),
        }
    }
}

/// Asks the backend for the report and parses it. Never fails: a backend error
/// yields an unannotated report.
pub async fn synthesize(
    llm: &dyn GenerationBackend,
    exchanges: &[Exchange],
    resume_data: &str,
) -> Report {
    let prompt = report_prompt(exchanges, resume_data);
    match llm
        .generate(AgentRole::Report, &prompt, REPORT_TEMPERATURE)
        .await
    {
        Ok(raw) => {
            let report = parse_report(&raw, exchanges);
            info!(
                "Report parsed: {} exchanges, {} topics",
                report.exchanges.len(),
                report.topics.len()
            );
            report
        }
        Err(e) => {
            warn!("Report generation failed, returning unannotated report: {e}");
            Report::unannotated(exchanges)
        }
    }
}

pub fn parse_report(raw: &str, exchanges: &[Exchange]) -> Report {
    let text = strip_markdown(raw);
    let (strengths, improvements) = extract_segments(&text);

    let exchanges = exchanges
        .iter()
        .enumerate()
        .map(|(i, e)| {
            feedback_for(
                e,
                strengths.get(i).map(String::as_str),
                improvements.get(i).map(String::as_str),
            )
        })
        .collect();

    Report {
        exchanges,
        topics: extract_topics(&text),
    }
}

/// Removes emphasis, code spans, links, headers, blockquotes, horizontal rules
/// and list markers. Text without markup is returned unchanged.
pub fn strip_markdown(text: &str) -> String {
    MARKDOWN_RULES
        .iter()
        .fold(text.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        })
}

/// Strength and improvement segments, each list in document order.
fn extract_segments(text: &str) -> (Vec<String>, Vec<String>) {
    let mut markers: Vec<(usize, bool)> = text
        .match_indices(STRENGTH_MARKER)
        .map(|(i, _)| (i, true))
        .chain(text.match_indices(IMPROVEMENT_MARKER).map(|(i, _)| (i, false)))
        .collect();
    markers.sort_by_key(|(i, _)| *i);

    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    for (n, (start, is_strength)) in markers.iter().enumerate() {
        let marker_len = if *is_strength {
            STRENGTH_MARKER.len()
        } else {
            IMPROVEMENT_MARKER.len()
        };
        let end = markers.get(n + 1).map(|(i, _)| *i).unwrap_or(text.len());
        let segment = text[start + marker_len..end].trim().to_string();
        if *is_strength {
            strengths.push(segment);
        } else {
            improvements.push(segment);
        }
    }
    (strengths, improvements)
}

/// Topics after the trailing marker, split on numbered items and line breaks.
fn extract_topics(text: &str) -> Vec<String> {
    let Some(idx) = text.find(TOPICS_MARKER) else {
        return Vec::new();
    };
    let tail = text[idx + TOPICS_MARKER.len()..].trim();

    NUMBERED_ITEM
        .split(tail)
        .flat_map(str::lines)
        .map(|t| t.trim().trim_start_matches('•').trim())
        .filter(|t| t.chars().count() >= MIN_TOPIC_CHARS)
        .map(String::from)
        .collect()
}

fn feedback_for(
    exchange: &Exchange,
    strength: Option<&str>,
    improvement: Option<&str>,
) -> ExchangeFeedback {
    let note = |s: Option<&str>| {
        s.filter(|s| !s.is_empty())
            .map(|s| vec![s.to_string()])
            .unwrap_or_default()
    };
    ExchangeFeedback {
        question: exchange.question.clone(),
        answer: exchange.answer.clone(),
        clarification_prompt: exchange.clarification_prompt.clone(),
        clarification_answer: exchange.clarification_answer.clone(),
        strengths: note(strength),
        improvements: note(improvement),
    }
}
