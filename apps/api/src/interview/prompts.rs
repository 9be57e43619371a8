// Interview LLM prompt templates and builders.
// System instructions per agent live in llm_client::prompts.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::interview::models::{Difficulty, Exchange};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").unwrap());

/// Marker the monitor prefixes to a violation reason.
pub const INAPPROPRIATE_MARKER: &str = "INAPPROPRIATE:";
/// Token the completeness judge returns for a thorough answer.
pub const COMPLETE_MARKER: &str = "COMPLETE";
pub const STRENGTH_MARKER: &str = "CORRECT:";
pub const IMPROVEMENT_MARKER: &str = "IMPROVE:";
pub const TOPICS_MARKER: &str = "RECOMMENDED TOPICS:";

pub const GREETING_PROMPT: &str = r#"Resume Data: {resume_data}
Candidate Name: {candidate_name}

Generate a brief, warm greeting for {candidate_name}. The greeting should:
1. Begin with "Hello {candidate_name}"
2. Very briefly mention something from their resume (one skill or experience)
3. Ask ONE simple question about their most recent job or experience
4. Keep it extremely concise (2-3 short sentences maximum)

The greeting must be brief as it may be converted to voice later."#;

pub const TECHNICAL_QUESTION_PROMPT: &str = r#"Resume Data: {resume_data}
Interview History: {history}
Question Number: {question_number}
Difficulty: {difficulty}

Generate a relevant technical interview question based on the candidate's resume. The question should:
1. Be specific to skills or experiences mentioned in their resume
2. Feel like it's coming from someone who has read their background
3. Be appropriately challenging based on their experience level
4. Be directly relevant to their field
5. Be clearly phrased as a question (no preambles or explanations)"#;

pub const CLARIFY_PROMPT: &str = r#"Original Question: {question}
Candidate Response: {answer}
Resume Data: {resume_data}

The candidate needs clarification. Your task is to:
1. Acknowledge their confusion
2. Explain the question in simpler terms
3. Provide a concrete example to illustrate what you're asking
4. Rephrase the question in a more approachable way

IMPORTANT: Respond in a direct, conversational manner WITHOUT any explanation of your reasoning."#;

pub const COMPLETENESS_PROMPT: &str = r#"Original Question: {question}
Candidate Response: {answer}
Resume Data: {resume_data}

Evaluate if this response is complete or needs a follow-up.
If the response is thorough and complete, respond with exactly "COMPLETE".
If the response is partial or could benefit from elaboration, provide a specific follow-up question.
If the response is off-topic, provide a more specific version of the original question.

IMPORTANT: If providing a follow-up question, give ONLY the question itself without any explanation of why you're asking it."#;

pub const MONITOR_PROMPT: &str = r#"Candidate Response: "{answer}"

Check for these behaviors strictly but fairly:
1. Repeated gibberish or nonsensical keyboard smashing.
2. Harsh, rude, or aggressive language.
3. Profanity or clearly offensive content.

If clearly inappropriate (repeated profanity/aggression/gibberish), respond:
"INAPPROPRIATE: [reason]"

If minor awkwardness, occasional mistakes, or nervousness, respond simply:
"ACCEPTABLE"

Be forgiving, human-like, and flexible. Only flag clear and serious issues.
Allow up to two minor instances before marking a response as inappropriate.
Only flag as inappropriate after clear repeated offenses (3 or more times) or severe disrespect/profanity."#;

pub const REPORT_PROMPT: &str = r#"Resume Data: {resume_data}

Interview Transcript:
{transcript}

Generate a detailed interview report that:
1. Analyzes each answer without scoring or grading
2. Identifies correct information (prefix with "CORRECT: ")
3. Identifies areas for improvement (prefix with "IMPROVE: ")
4. Recommends 3-5 specific technical topics (not platforms) the candidate should focus on

Format guidelines:
- ABSOLUTELY NO MARKDOWN SYNTAX - use plain text only without asterisks, backticks, hashes, etc.
- For each question, in order, give one "CORRECT: " line and one "IMPROVE: " line
- Keep language encouraging and constructive

Format the report with these sections:
- QUESTION ANALYSIS (for each question)
- KEY STRENGTHS
- FOCUS AREAS
- RECOMMENDED TOPICS: followed by a numbered list

Do not include any numerical scores or grades."#;

/// Fills `{name}` placeholders in a single pass. Inserted values are never
/// rescanned; unknown placeholders are left as written.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub fn greeting_prompt(resume_data: &str, candidate_name: &str) -> String {
    fill(
        GREETING_PROMPT,
        &[("resume_data", resume_data), ("candidate_name", candidate_name)],
    )
}

pub fn technical_question_prompt(
    resume_data: &str,
    history: &str,
    question_count: usize,
    difficulty: Difficulty,
) -> String {
    let question_number = (question_count + 1).to_string();
    fill(
        TECHNICAL_QUESTION_PROMPT,
        &[
            ("resume_data", resume_data),
            ("history", history),
            ("question_number", &question_number),
            ("difficulty", difficulty.as_str()),
        ],
    )
}

pub fn clarify_prompt(question: &str, answer: &str, resume_data: &str) -> String {
    fill(
        CLARIFY_PROMPT,
        &[("question", question), ("answer", answer), ("resume_data", resume_data)],
    )
}

pub fn completeness_prompt(question: &str, answer: &str, resume_data: &str) -> String {
    fill(
        COMPLETENESS_PROMPT,
        &[("question", question), ("answer", answer), ("resume_data", resume_data)],
    )
}

pub fn monitor_prompt(answer: &str) -> String {
    fill(MONITOR_PROMPT, &[("answer", answer)])
}

pub fn report_prompt(exchanges: &[Exchange], resume_data: &str) -> String {
    let transcript = exchanges
        .iter()
        .enumerate()
        .map(|(i, e)| format!("Q{}: {}\nAnswer: {}", i + 1, e.question, e.answer))
        .collect::<Vec<_>>()
        .join("\n\n");
    fill(
        REPORT_PROMPT,
        &[("resume_data", resume_data), ("transcript", &transcript)],
    )
}
