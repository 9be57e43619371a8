//! Resume ingestion: turns an uploaded file into plain text and pulls out the
//! candidate's name.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Used when no capitalized bigram is found near the top of the resume.
pub const PLACEHOLDER_NAME: &str = "Candidate";

/// Only the head of the resume is searched for a name.
const NAME_SEARCH_WINDOW: usize = 500;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z][a-z]+\s+[A-Z][a-z]+)").unwrap());

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Plain-text resume is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Unsupported resume type '{0}'; upload a PDF or plain-text file")]
    UnsupportedType(String),

    #[error("Resume contains no readable text")]
    EmptyContent,

    #[error("Malformed upload: {0}")]
    Malformed(String),
}

/// Extracts text from an uploaded resume.
///
/// PDF: every page's text, in page order. Plain text: decoded as UTF-8.
/// Any other MIME type yields empty text; callers decide whether that is fatal.
pub fn extract_resume_text(data: &[u8], mime_type: &str) -> Result<String, IngestionError> {
    match normalize_mime(mime_type).as_str() {
        "application/pdf" => {
            pdf_extract::extract_text_from_mem(data).map_err(|e| IngestionError::Pdf(e.to_string()))
        }
        "text/plain" => Ok(String::from_utf8(data.to_vec())?),
        _ => Ok(String::new()),
    }
}

/// Like [`extract_resume_text`], but rejects types and content that cannot
/// start an interview.
pub fn ingest_resume(data: &[u8], mime_type: &str) -> Result<String, IngestionError> {
    let mime = normalize_mime(mime_type);
    if mime != "application/pdf" && mime != "text/plain" {
        return Err(IngestionError::UnsupportedType(mime_type.to_string()));
    }
    let text = extract_resume_text(data, &mime)?;
    if text.trim().is_empty() {
        return Err(IngestionError::EmptyContent);
    }
    Ok(text)
}

/// Best-effort name: the first two consecutive capitalized words in the first
/// 500 characters, else [`PLACEHOLDER_NAME`].
pub fn extract_candidate_name(resume_text: &str) -> String {
    let head: String = resume_text.chars().take(NAME_SEARCH_WINDOW).collect();
    NAME_PATTERN
        .captures(&head)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string())
}

/// Strips parameters (`text/plain; charset=utf-8`) and lowercases.
fn normalize_mime(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
