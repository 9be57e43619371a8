//! Interview Orchestrator: the phase state machine.
//!
//! Flow per answer: conduct monitor → record answer → clarification check →
//! advance (next question or report).
//!
//! Every transition is computed on a working copy of the session and
//! committed only when all backend calls it needs have succeeded, so a failed
//! question generation leaves the session exactly as it was and the answer can
//! simply be resubmitted. Callers must hold the session's lock for the whole
//! call.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::interview::classifiers::{
    check_appropriateness, evaluate_response, AppropriatenessVerdict, ClarificationVerdict,
    FollowUpExtractor, InterrogativeClauseExtractor,
};
use crate::interview::models::{Difficulty, Exchange, Phase, Session};
use crate::interview::prompts::{greeting_prompt, technical_question_prompt};
use crate::interview::report::synthesize;
use crate::llm_client::{AgentRole, GenerationBackend, GenerationError};
use crate::resume::store::ResumeStore;

const GREETING_QUERY: &str = "background experience";
const TECHNICAL_QUERY: &str = "technical skills";
const REPORT_QUERY: &str = "complete profile";

const GREETING_TEMPERATURE: f32 = 0.7;
const QUESTION_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("Interview has already started")]
    AlreadyStarted,

    #[error("Interview has not started yet")]
    NotStarted,

    #[error("Interview was terminated: {0}")]
    Terminated(String),

    #[error("Interview is already complete")]
    Completed,

    #[error("Answer cannot be empty")]
    EmptyAnswer,

    #[error("Question generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// What a submitted answer led to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Transition {
    Terminated { reason: String },
    Clarification { prompt: String, follow_up: bool },
    NextQuestion { question: String, difficulty: Difficulty },
    Completed,
}

pub struct Orchestrator {
    llm: Arc<dyn GenerationBackend>,
    resumes: Arc<dyn ResumeStore>,
    extractor: Arc<dyn FollowUpExtractor>,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn GenerationBackend>, resumes: Arc<dyn ResumeStore>) -> Self {
        Self {
            llm,
            resumes,
            extractor: Arc::new(InterrogativeClauseExtractor),
        }
    }

    #[cfg(test)]
    pub fn with_extractor(mut self, extractor: Arc<dyn FollowUpExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Generates the greeting, which becomes the first question.
    pub async fn start(&self, session: &mut Session) -> Result<String, InterviewError> {
        if session.is_started() {
            return Err(InterviewError::AlreadyStarted);
        }

        let context = self.context(session, GREETING_QUERY).await;
        let greeting = self
            .llm
            .generate(
                AgentRole::Greeting,
                &greeting_prompt(&context, &session.candidate_name),
                GREETING_TEMPERATURE,
            )
            .await?;

        session.questions.push(greeting.clone());
        session.touch();
        info!("Interview started for session {}", session.session_id);
        Ok(greeting)
    }

    pub async fn submit_answer(
        &self,
        session: &mut Session,
        answer: &str,
    ) -> Result<Transition, InterviewError> {
        ensure_accepting(session)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(InterviewError::EmptyAnswer);
        }

        if let AppropriatenessVerdict::Inappropriate { reason } =
            check_appropriateness(self.llm.as_ref(), answer).await
        {
            terminate(session, &reason);
            return Ok(Transition::Terminated { reason });
        }

        let mut next = session.clone();
        let transition = match next.pending_clarification.take() {
            Some(prompt) => {
                // The reply closes the clarification round; no nested round.
                if let Some(last) = next.exchanges.last_mut() {
                    last.clarification_prompt = Some(prompt);
                    last.clarification_answer = Some(answer.to_string());
                }
                self.advance(&mut next).await?
            }
            None => {
                let question = next.current_question().unwrap_or_default().to_string();
                next.exchanges.push(Exchange {
                    phase: next.phase,
                    question: question.clone(),
                    answer: answer.to_string(),
                    clarification_prompt: None,
                    clarification_answer: None,
                });

                let context = self.context(&next, &question).await;
                let verdict = evaluate_response(
                    self.llm.as_ref(),
                    self.extractor.as_ref(),
                    &question,
                    answer,
                    &context,
                )
                .await;

                match verdict.prompt() {
                    None => self.advance(&mut next).await?,
                    Some(prompt) => {
                        next.pending_clarification = Some(prompt.to_string());
                        Transition::Clarification {
                            prompt: prompt.to_string(),
                            follow_up: matches!(verdict, ClarificationVerdict::NeedsFollowUp(_)),
                        }
                    }
                }
            }
        };

        debug_assert!(session.phase.can_advance_to(next.phase));
        next.touch();
        *session = next;

        info!(
            "Session {} -> {} (question {}, {} exchanges)",
            session.session_id,
            session.phase,
            session.question_count,
            session.exchanges.len()
        );
        Ok(transition)
    }

    /// Moves past the current question as if its answer were complete.
    async fn advance(&self, session: &mut Session) -> Result<Transition, InterviewError> {
        match session.phase {
            Phase::Greeting => {
                let (question, difficulty) = self.next_question(session, "", 0).await?;
                session.phase = Phase::Technical;
                session.question_count = 0;
                session.questions.push(question.clone());
                Ok(Transition::NextQuestion {
                    question,
                    difficulty,
                })
            }
            Phase::Technical if session.budget_reached() => {
                let context = self.context(session, REPORT_QUERY).await;
                let report = synthesize(self.llm.as_ref(), &session.exchanges, &context).await;
                session.phase = Phase::Completed;
                session.report = Some(report);
                Ok(Transition::Completed)
            }
            Phase::Technical => {
                let next_count = session.question_count + 1;
                let history = session.serialized_history();
                let (question, difficulty) =
                    self.next_question(session, &history, next_count).await?;
                session.question_count = next_count;
                session.questions.push(question.clone());
                Ok(Transition::NextQuestion {
                    question,
                    difficulty,
                })
            }
            Phase::Completed => Err(InterviewError::Completed),
            Phase::Terminated => Err(InterviewError::Terminated(
                session.termination_reason.clone().unwrap_or_default(),
            )),
        }
    }

    async fn next_question(
        &self,
        session: &Session,
        history: &str,
        question_count: usize,
    ) -> Result<(String, Difficulty), InterviewError> {
        let difficulty = Difficulty::for_question(question_count);
        let context = self.context(session, TECHNICAL_QUERY).await;
        let prompt = technical_question_prompt(&context, history, question_count, difficulty);
        let question = self
            .llm
            .generate(AgentRole::Technical, &prompt, QUESTION_TEMPERATURE)
            .await?;
        Ok((question, difficulty))
    }

    /// Resume context for `query`. Retrieval failures degrade to no context.
    async fn context(&self, session: &Session, query: &str) -> String {
        match self.resumes.retrieve(session.session_id, query).await {
            Ok(context) => context,
            Err(e) => {
                warn!(
                    "Resume retrieval failed for session {}, continuing without context: {e}",
                    session.session_id
                );
                String::new()
            }
        }
    }
}

fn ensure_accepting(session: &Session) -> Result<(), InterviewError> {
    match session.phase {
        Phase::Terminated => Err(InterviewError::Terminated(
            session.termination_reason.clone().unwrap_or_default(),
        )),
        Phase::Completed => Err(InterviewError::Completed),
        _ if !session.is_started() => Err(InterviewError::NotStarted),
        _ => Ok(()),
    }
}

fn terminate(session: &mut Session, reason: &str) {
    session.phase = Phase::Terminated;
    session.termination_reason = Some(reason.to_string());
    session.pending_clarification = None;
    session.touch();
    info!(
        "Session {} terminated by conduct monitor: {}",
        session.session_id, reason
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::TECHNICAL_QUESTION_BUDGET;
    use crate::interview::testing::{CallKind, ScriptedBackend};
    use crate::resume::store::InMemoryResumeStore;
    use std::sync::atomic::{AtomicBool, Ordering};
    use uuid::Uuid;

    const RESUME: &str = "Jane Doe\nSenior backend engineer.\nTechnical skills: Rust, tokio, PostgreSQL, Kubernetes.\nBuilt a payments ledger handling 2k rps.";

    async fn setup(backend: Arc<ScriptedBackend>) -> (Orchestrator, Session) {
        let store = Arc::new(InMemoryResumeStore::default());
        let session_id = Uuid::new_v4();
        let name = store.store(RESUME, session_id).await.unwrap();
        let orchestrator = Orchestrator::new(backend, store);
        (orchestrator, Session::new(session_id, name))
    }

    fn unavailable(message: &str) -> GenerationError {
        GenerationError::Api {
            status: 503,
            message: message.to_string(),
        }
    }

    async fn started(backend: Arc<ScriptedBackend>) -> (Orchestrator, Session) {
        let (orchestrator, mut session) = setup(backend).await;
        orchestrator.start(&mut session).await.unwrap();
        (orchestrator, session)
    }

    #[tokio::test]
    async fn test_start_generates_greeting_once() {
        let backend = Arc::new(ScriptedBackend::happy());
        let (orchestrator, mut session) = setup(backend.clone()).await;

        let greeting = orchestrator.start(&mut session).await.unwrap();
        assert!(greeting.starts_with("Hello Jane Doe"));
        assert_eq!(session.current_question(), Some(greeting.as_str()));
        assert_eq!(session.phase, Phase::Greeting);

        let again = orchestrator.start(&mut session).await;
        assert!(matches!(again, Err(InterviewError::AlreadyStarted)));
        assert_eq!(backend.count(CallKind::Greeting), 1);
    }

    #[tokio::test]
    async fn test_answer_before_start_is_rejected() {
        let (orchestrator, mut session) = setup(Arc::new(ScriptedBackend::happy())).await;
        let result = orchestrator.submit_answer(&mut session, "hello").await;
        assert!(matches!(result, Err(InterviewError::NotStarted)));
    }

    #[tokio::test]
    async fn test_blank_answer_is_rejected() {
        let (orchestrator, mut session) = started(Arc::new(ScriptedBackend::happy())).await;
        let result = orchestrator.submit_answer(&mut session, "   ").await;
        assert!(matches!(result, Err(InterviewError::EmptyAnswer)));
        assert!(session.exchanges.is_empty());
    }

    #[tokio::test]
    async fn test_confused_greeting_answer_requests_clarification() {
        let backend = Arc::new(ScriptedBackend::happy());
        let (orchestrator, mut session) = started(backend.clone()).await;

        let transition = orchestrator
            .submit_answer(&mut session, "I don't understand, can you clarify?")
            .await
            .unwrap();

        assert!(matches!(
            transition,
            Transition::Clarification {
                follow_up: false,
                ..
            }
        ));
        assert_eq!(session.phase, Phase::Greeting);
        assert!(session.pending_clarification.is_some());
        assert_eq!(session.question_count, 0);
        assert_eq!(session.questions.len(), 1);
        assert_eq!(backend.count(CallKind::Completeness), 0);
        assert_eq!(backend.count(CallKind::Clarify), 1);
    }

    #[tokio::test]
    async fn test_clarification_reply_advances_without_reevaluation() {
        let backend = Arc::new(ScriptedBackend::happy());
        let (orchestrator, mut session) = started(backend.clone()).await;

        orchestrator
            .submit_answer(&mut session, "What do you mean?")
            .await
            .unwrap();
        // The reply is confused again, but a clarification round happens once.
        let transition = orchestrator
            .submit_answer(&mut session, "Still not sure?")
            .await
            .unwrap();

        assert_eq!(
            transition,
            Transition::NextQuestion {
                question: "Technical question 1?".to_string(),
                difficulty: Difficulty::Introductory,
            }
        );
        assert_eq!(session.phase, Phase::Technical);
        assert!(session.pending_clarification.is_none());
        assert_eq!(session.exchanges.len(), 1);
        let exchange = &session.exchanges[0];
        assert_eq!(exchange.answer, "What do you mean?");
        assert_eq!(exchange.clarification_answer.as_deref(), Some("Still not sure?"));
        assert!(exchange.clarification_prompt.is_some());
        assert_eq!(backend.count(CallKind::Clarify), 1);
    }

    #[tokio::test]
    async fn test_first_technical_question_has_empty_history() {
        let backend = Arc::new(ScriptedBackend::happy());
        let (orchestrator, mut session) = started(backend.clone()).await;
        orchestrator
            .submit_answer(&mut session, "I led the ledger rewrite.")
            .await
            .unwrap();

        let prompt = backend.prompts(CallKind::Question).remove(0);
        assert!(prompt.contains("Interview History: \n"));
        assert!(prompt.contains("Difficulty: introductory"));
        assert!(prompt.contains("Technical skills"));
    }

    #[tokio::test]
    async fn test_full_interview_completes_at_budget() {
        let backend = Arc::new(ScriptedBackend::happy());
        let (orchestrator, mut session) = started(backend.clone()).await;
        let mut phases = vec![session.phase];

        orchestrator
            .submit_answer(&mut session, "I built a payments ledger.")
            .await
            .unwrap();
        phases.push(session.phase);

        for i in 0..TECHNICAL_QUESTION_BUDGET {
            assert_eq!(session.phase, Phase::Technical, "still technical before answer {i}");
            assert_eq!(session.question_count, i);
            assert_eq!(backend.count(CallKind::Report), 0);
            let transition = orchestrator
                .submit_answer(&mut session, &format!("Detailed answer number {i}."))
                .await
                .unwrap();
            phases.push(session.phase);
            if i + 1 < TECHNICAL_QUESTION_BUDGET {
                assert!(matches!(transition, Transition::NextQuestion { .. }));
            } else {
                assert_eq!(transition, Transition::Completed);
            }
        }

        assert_eq!(session.phase, Phase::Completed);
        assert_eq!(session.technical_answers(), TECHNICAL_QUESTION_BUDGET);
        assert_eq!(session.question_count, 4);
        assert_eq!(session.questions.len(), 1 + TECHNICAL_QUESTION_BUDGET);
        assert_eq!(backend.count(CallKind::Report), 1);

        for pair in phases.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }

        let difficulties: Vec<bool> = backend
            .prompts(CallKind::Question)
            .iter()
            .zip([
                "introductory",
                "introductory",
                "intermediate",
                "intermediate",
                "advanced",
            ])
            .map(|(p, d)| p.contains(&format!("Difficulty: {d}")))
            .collect();
        assert_eq!(difficulties, vec![true; 5]);

        let report = session.report.as_ref().unwrap();
        assert_eq!(report.exchanges.len(), 6);
        assert_eq!(report.exchanges[0].strengths, vec!["Warm, specific introduction."]);
        assert_eq!(report.topics, vec!["Async Rust", "Database indexing"]);

        let after = orchestrator.submit_answer(&mut session, "one more").await;
        assert!(matches!(after, Err(InterviewError::Completed)));
        assert_eq!(backend.count(CallKind::Report), 1);
    }

    #[tokio::test]
    async fn test_history_carries_prior_exchanges() {
        let backend = Arc::new(ScriptedBackend::happy());
        let (orchestrator, mut session) = started(backend.clone()).await;
        orchestrator.submit_answer(&mut session, "Intro answer").await.unwrap();
        orchestrator.submit_answer(&mut session, "Ownership answer").await.unwrap();

        let prompts = backend.prompts(CallKind::Question);
        assert!(prompts[1].contains("A: Intro answer\nQ: Technical question 1?\nA: Ownership answer"));
        assert!(prompts[1].contains("Question Number: 2"));
    }

    #[tokio::test]
    async fn test_profanity_terminates_without_recording() {
        let backend = Arc::new(ScriptedBackend::new(|kind, prompt| match kind {
            CallKind::Monitor if prompt.contains("damn") => {
                Ok("INAPPROPRIATE: Repeated profanity in the response.".to_string())
            }
            other => ScriptedBackend::happy_reply(other, prompt),
        }));
        let (orchestrator, mut session) = started(backend.clone()).await;
        orchestrator.submit_answer(&mut session, "Fine intro").await.unwrap();
        let exchanges_before = session.exchanges.clone();

        let transition = orchestrator
            .submit_answer(&mut session, "damn damn damn this question")
            .await
            .unwrap();

        assert_eq!(
            transition,
            Transition::Terminated {
                reason: "Repeated profanity in the response.".to_string()
            }
        );
        assert_eq!(session.phase, Phase::Terminated);
        assert_eq!(session.exchanges, exchanges_before);
        assert_eq!(
            session.termination_reason.as_deref(),
            Some("Repeated profanity in the response.")
        );

        let questions_before = session.questions.len();
        let after = orchestrator.submit_answer(&mut session, "sorry").await;
        assert!(matches!(after, Err(InterviewError::Terminated(_))));
        assert_eq!(session.questions.len(), questions_before);
        assert_eq!(session.exchanges, exchanges_before);
    }

    #[tokio::test]
    async fn test_monitor_outage_falls_back_to_acceptable() {
        let backend = Arc::new(ScriptedBackend::new(|kind, prompt| match kind {
            CallKind::Monitor => Err(unavailable("down")),
            other => ScriptedBackend::happy_reply(other, prompt),
        }));
        let (orchestrator, mut session) = started(backend).await;
        let transition = orchestrator.submit_answer(&mut session, "Hi there").await.unwrap();
        assert!(matches!(transition, Transition::NextQuestion { .. }));
        assert_eq!(session.phase, Phase::Technical);
    }

    #[tokio::test]
    async fn test_completeness_outage_falls_back_to_complete() {
        let backend = Arc::new(ScriptedBackend::new(|kind, prompt| match kind {
            CallKind::Completeness => Err(unavailable("down")),
            other => ScriptedBackend::happy_reply(other, prompt),
        }));
        let (orchestrator, mut session) = started(backend).await;
        orchestrator.submit_answer(&mut session, "Hi there").await.unwrap();
        assert_eq!(session.phase, Phase::Technical);
        assert!(session.pending_clarification.is_none());
    }

    #[tokio::test]
    async fn test_partial_answer_gets_follow_up() {
        let backend = Arc::new(ScriptedBackend::new(|kind, prompt| match kind {
            CallKind::Completeness if prompt.contains("Candidate Response: Tokio.") => Ok(
                "The answer is thin. Could you describe how you sized the worker pool?".to_string(),
            ),
            other => ScriptedBackend::happy_reply(other, prompt),
        }));
        let (orchestrator, mut session) = started(backend.clone()).await;
        orchestrator.submit_answer(&mut session, "Intro").await.unwrap();

        let transition = orchestrator.submit_answer(&mut session, "Tokio.").await.unwrap();
        assert_eq!(
            transition,
            Transition::Clarification {
                prompt: "Could you describe how you sized the worker pool?".to_string(),
                follow_up: true,
            }
        );
        assert_eq!(session.question_count, 0);
        assert_eq!(session.technical_answers(), 1);

        let completeness_calls = backend.count(CallKind::Completeness);
        orchestrator
            .submit_answer(&mut session, "Eight workers, one per core.")
            .await
            .unwrap();
        assert_eq!(backend.count(CallKind::Completeness), completeness_calls);
        assert_eq!(session.question_count, 1);
        assert_eq!(session.technical_answers(), 1);
        assert_eq!(
            session.exchanges[1].clarification_answer.as_deref(),
            Some("Eight workers, one per core.")
        );
    }

    #[tokio::test]
    async fn test_clarification_on_last_answer_completes_after_reply() {
        let backend = Arc::new(ScriptedBackend::new(|kind, prompt| match kind {
            CallKind::Completeness if prompt.contains("Candidate Response: Final answer.") => {
                Ok("Could you quantify the latency win?".to_string())
            }
            other => ScriptedBackend::happy_reply(other, prompt),
        }));
        let (orchestrator, mut session) = started(backend.clone()).await;
        orchestrator.submit_answer(&mut session, "Intro").await.unwrap();
        for i in 0..TECHNICAL_QUESTION_BUDGET - 1 {
            orchestrator
                .submit_answer(&mut session, &format!("Detailed answer number {i}."))
                .await
                .unwrap();
        }

        let transition = orchestrator
            .submit_answer(&mut session, "Final answer.")
            .await
            .unwrap();
        assert_eq!(
            transition,
            Transition::Clarification {
                prompt: "Could you quantify the latency win?".to_string(),
                follow_up: true,
            }
        );
        assert_eq!(session.phase, Phase::Technical);
        assert_eq!(backend.count(CallKind::Report), 0);
        assert!(session.report.is_none());

        let transition = orchestrator
            .submit_answer(&mut session, "p99 dropped from 40ms to 12ms.")
            .await
            .unwrap();
        assert_eq!(transition, Transition::Completed);
        assert_eq!(session.phase, Phase::Completed);
        assert_eq!(backend.count(CallKind::Report), 1);
        assert_eq!(session.technical_answers(), TECHNICAL_QUESTION_BUDGET);
        assert_eq!(backend.count(CallKind::Question), TECHNICAL_QUESTION_BUDGET);
        assert_eq!(
            session.exchanges.last().and_then(|e| e.clarification_answer.as_deref()),
            Some("p99 dropped from 40ms to 12ms.")
        );
        assert!(session.report.is_some());
    }

    struct FirstLine;

    impl FollowUpExtractor for FirstLine {
        fn extract(&self, text: &str) -> Option<String> {
            text.lines().next().map(str::to_string)
        }
    }

    #[tokio::test]
    async fn test_follow_up_extractor_is_pluggable() {
        let backend = Arc::new(ScriptedBackend::new(|kind, prompt| match kind {
            CallKind::Completeness => Ok("Say more about testing\nWhat was covered?".to_string()),
            other => ScriptedBackend::happy_reply(other, prompt),
        }));
        let (orchestrator, mut session) = setup(backend).await;
        let orchestrator = orchestrator.with_extractor(Arc::new(FirstLine));
        orchestrator.start(&mut session).await.unwrap();

        let transition = orchestrator.submit_answer(&mut session, "Intro").await.unwrap();
        assert_eq!(
            transition,
            Transition::Clarification {
                prompt: "Say more about testing".to_string(),
                follow_up: true,
            }
        );
    }

    #[tokio::test]
    async fn test_failed_question_generation_leaves_session_unchanged() {
        let fail = Arc::new(AtomicBool::new(true));
        let flag = fail.clone();
        let backend = Arc::new(ScriptedBackend::new(move |kind, prompt| match kind {
            CallKind::Question if flag.load(Ordering::SeqCst) => {
                Err(unavailable("timeout"))
            }
            other => ScriptedBackend::happy_reply(other, prompt),
        }));
        let (orchestrator, mut session) = started(backend).await;

        let result = orchestrator.submit_answer(&mut session, "My intro").await;
        assert!(matches!(result, Err(InterviewError::Generation(_))));
        assert_eq!(session.phase, Phase::Greeting);
        assert!(session.exchanges.is_empty());
        assert_eq!(session.questions.len(), 1);

        fail.store(false, Ordering::SeqCst);
        orchestrator.submit_answer(&mut session, "My intro").await.unwrap();
        assert_eq!(session.phase, Phase::Technical);
        assert_eq!(session.exchanges.len(), 1);
    }

    #[tokio::test]
    async fn test_report_outage_still_completes() {
        let backend = Arc::new(ScriptedBackend::new(|kind, prompt| match kind {
            CallKind::Report => Err(GenerationError::EmptyContent),
            other => ScriptedBackend::happy_reply(other, prompt),
        }));
        let (orchestrator, mut session) = started(backend).await;
        for i in 0..=TECHNICAL_QUESTION_BUDGET {
            orchestrator
                .submit_answer(&mut session, &format!("answer {i}"))
                .await
                .unwrap();
        }
        assert_eq!(session.phase, Phase::Completed);
        let report = session.report.unwrap();
        assert_eq!(report.exchanges.len(), 6);
        assert!(report.exchanges.iter().all(|e| e.strengths.is_empty()));
        assert!(report.topics.is_empty());
    }

    #[tokio::test]
    async fn test_restart_discards_interview() {
        let (orchestrator, mut session) = started(Arc::new(ScriptedBackend::happy())).await;
        orchestrator.submit_answer(&mut session, "intro").await.unwrap();

        let fresh = session.restarted();
        assert_eq!(fresh.session_id, session.session_id);
        assert_eq!(fresh.candidate_name, "Jane Doe");
        assert_eq!(fresh.phase, Phase::Greeting);
        assert!(fresh.exchanges.is_empty() && fresh.questions.is_empty());
        assert!(fresh.report.is_none());
    }
}
