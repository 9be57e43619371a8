use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interview::report::Report;

/// Number of technical questions asked before the report is synthesized.
pub const TECHNICAL_QUESTION_BUDGET: usize = 5;

/// Coarse stage of the interview.
///
/// Moves Greeting → Technical → Completed, or from anywhere to Terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Greeting,
    Technical,
    Completed,
    Terminated,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Terminated)
    }

    fn rank(self) -> u8 {
        match self {
            Phase::Greeting => 0,
            Phase::Technical => 1,
            Phase::Completed => 2,
            Phase::Terminated => 3,
        }
    }

    /// Whether moving from `self` to `next` respects phase ordering.
    pub fn can_advance_to(self, next: Phase) -> bool {
        match (self, next) {
            (a, b) if a == b => true,
            (a, Phase::Terminated) => !a.is_terminal(),
            (Phase::Greeting, Phase::Completed) => false,
            (a, b) => !a.is_terminal() && b.rank() == a.rank() + 1,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Greeting => write!(f, "greeting"),
            Phase::Technical => write!(f, "technical"),
            Phase::Completed => write!(f, "completed"),
            Phase::Terminated => write!(f, "terminated"),
        }
    }
}

/// Difficulty tier of a technical question, derived from its 0-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Introductory,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn for_question(question_count: usize) -> Self {
        match question_count {
            0..=1 => Difficulty::Introductory,
            2..=3 => Difficulty::Intermediate,
            _ => Difficulty::Advanced,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Introductory => "introductory",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// One question, the candidate's answer, and an optional clarification round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub phase: Phase,
    pub question: String,
    pub answer: String,
    pub clarification_prompt: Option<String>,
    pub clarification_answer: Option<String>,
}

/// One interview run. All transitions go through the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: Uuid,
    pub candidate_name: String,
    pub phase: Phase,
    /// 0-based index of the current technical question.
    pub question_count: usize,
    pub pending_clarification: Option<String>,
    /// Every question presented, greeting first.
    pub questions: Vec<String>,
    pub exchanges: Vec<Exchange>,
    pub termination_reason: Option<String>,
    pub report: Option<Report>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(session_id: Uuid, candidate_name: String) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            candidate_name,
            phase: Phase::Greeting,
            question_count: 0,
            pending_clarification: None,
            questions: Vec::new(),
            exchanges: Vec::new(),
            termination_reason: None,
            report: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A fresh interview for the same candidate and resume.
    pub fn restarted(&self) -> Self {
        Self::new(self.session_id, self.candidate_name.clone())
    }

    pub fn is_started(&self) -> bool {
        !self.questions.is_empty()
    }

    pub fn accepts_input(&self) -> bool {
        self.is_started() && !self.phase.is_terminal()
    }

    pub fn current_question(&self) -> Option<&str> {
        self.questions.last().map(String::as_str)
    }

    /// Technical exchanges that are answered. Once the next question exists
    /// (or the session completes) these are closed.
    pub fn technical_answers(&self) -> usize {
        self.exchanges
            .iter()
            .filter(|e| e.phase == Phase::Technical)
            .count()
    }

    pub fn budget_reached(&self) -> bool {
        self.technical_answers() >= TECHNICAL_QUESTION_BUDGET
    }

    /// Prior question/answer pairs, in order, as sent to the question generator.
    pub fn serialized_history(&self) -> String {
        self.exchanges
            .iter()
            .map(|e| format!("Q: {}\nA: {}", e.question, e.answer))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// What the candidate is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    Greeting,
    Question,
    Clarification,
}

/// UI-observable projection of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub candidate_name: String,
    pub phase: Phase,
    pub question_count: usize,
    pub prompt_kind: Option<PromptKind>,
    pub current_prompt: Option<String>,
    pub accepting_input: bool,
    pub answered: usize,
    pub termination_reason: Option<String>,
    pub report: Option<Report>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let (prompt_kind, current_prompt) = if session.phase.is_terminal() {
            (None, None)
        } else if let Some(clarification) = &session.pending_clarification {
            (Some(PromptKind::Clarification), Some(clarification.clone()))
        } else {
            match session.current_question() {
                Some(q) if session.phase == Phase::Greeting => {
                    (Some(PromptKind::Greeting), Some(q.to_string()))
                }
                Some(q) => (Some(PromptKind::Question), Some(q.to_string())),
                None => (None, None),
            }
        };

        SessionView {
            session_id: session.session_id,
            candidate_name: session.candidate_name.clone(),
            phase: session.phase,
            question_count: session.question_count,
            prompt_kind,
            current_prompt,
            accepting_input: session.accepts_input(),
            answered: session.exchanges.len(),
            termination_reason: session.termination_reason.clone(),
            report: session.report.clone(),
        }
    }
}
