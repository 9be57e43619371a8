//! Scripted generation backend for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::interview::prompts::INAPPROPRIATE_MARKER;
use crate::llm_client::{AgentRole, GenerationBackend, GenerationError};

/// Which interview step a backend call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Monitor,
    Greeting,
    Question,
    Clarify,
    Completeness,
    Report,
}

impl CallKind {
    fn of(role: AgentRole, prompt: &str) -> Self {
        match role {
            AgentRole::Greeting => CallKind::Greeting,
            AgentRole::Report => CallKind::Report,
            AgentRole::Technical if prompt.contains(INAPPROPRIATE_MARKER) => CallKind::Monitor,
            AgentRole::Technical => CallKind::Question,
            AgentRole::Clarification if prompt.contains("needs clarification") => {
                CallKind::Clarify
            }
            AgentRole::Clarification => CallKind::Completeness,
        }
    }
}

type Script = Box<dyn Fn(CallKind, &str) -> Result<String, GenerationError> + Send + Sync>;

pub struct ScriptedBackend {
    script: Script,
    calls: Mutex<Vec<(CallKind, String)>>,
}

impl ScriptedBackend {
    pub fn new(
        script: impl Fn(CallKind, &str) -> Result<String, GenerationError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every check passes and every answer is complete.
    pub fn happy() -> Self {
        Self::new(Self::happy_reply)
    }

    pub fn happy_reply(kind: CallKind, prompt: &str) -> Result<String, GenerationError> {
        let reply = match kind {
            CallKind::Monitor => "ACCEPTABLE".to_string(),
            CallKind::Greeting => {
                let name = field(prompt, "Candidate Name: ").unwrap_or("there");
                format!("Hello {name}! I see you built a payments ledger. What was your most recent role?")
            }
            CallKind::Question => {
                let number = field(prompt, "Question Number: ").unwrap_or("?");
                format!("Technical question {number}?")
            }
            CallKind::Clarify => {
                "No problem. Put simply: tell me about a project you are proud of.".to_string()
            }
            CallKind::Completeness => "COMPLETE".to_string(),
            CallKind::Report => "QUESTION ANALYSIS\n\
                CORRECT: Warm, specific introduction.\n\
                IMPROVE: Mention team size.\n\
                RECOMMENDED TOPICS:\n\
                1. Async Rust\n\
                2. Database indexing"
                .to_string(),
        };
        Ok(reply)
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    pub fn prompts(&self, kind: CallKind) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        role: AgentRole,
        prompt: &str,
        _temperature: f32,
    ) -> Result<String, GenerationError> {
        let kind = CallKind::of(role, prompt);
        self.calls.lock().unwrap().push((kind, prompt.to_string()));
        (self.script)(kind, prompt)
    }
}

/// Value of a `Label: value` line in a prompt.
fn field<'a>(prompt: &'a str, label: &str) -> Option<&'a str> {
    prompt
        .lines()
        .find_map(|l| l.trim().strip_prefix(label))
        .map(str::trim)
}
