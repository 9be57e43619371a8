use anyhow::anyhow;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::{Session, SessionView};
use crate::interview::orchestrator::Transition;
use crate::interview::sessions::SessionHandle;
use crate::resume::ingest::{ingest_resume, IngestionError};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Serialize)]
pub struct AnswerResponse {
    #[serde(flatten)]
    pub transition: Transition,
    pub session: SessionView,
}

struct ResumeUpload {
    data: Bytes,
    mime_type: String,
}

/// POST /api/v1/sessions
/// Ingests an uploaded resume (multipart field `resume`) and opens a session.
pub async fn handle_create_session(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let upload = read_resume_field(&mut multipart).await?;
    let text = tokio::task::spawn_blocking(move || ingest_resume(&upload.data, &upload.mime_type))
        .await
        .map_err(|e| anyhow!("resume extraction task failed: {e}"))??;

    let session_id = Uuid::new_v4();
    let candidate_name = state
        .resumes
        .store(&text, session_id)
        .await
        .map_err(anyhow::Error::from)?;

    let session = Session::new(session_id, candidate_name);
    let view = SessionView::from(&session);
    state.sessions.insert(session).await;
    info!("Created session {session_id} for {}", view.candidate_name);

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

/// POST /api/v1/sessions/:id/start
pub async fn handle_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    state.orchestrator.start(&mut session).await?;
    Ok(Json(SessionView::from(&*session)))
}

/// POST /api/v1/sessions/:id/answers
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    let transition = state
        .orchestrator
        .submit_answer(&mut session, &req.answer)
        .await?;
    Ok(Json(AnswerResponse {
        transition,
        session: SessionView::from(&*session),
    }))
}

/// POST /api/v1/sessions/:id/restart
/// Resets the interview while keeping the uploaded resume.
pub async fn handle_restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    *session = session.restarted();
    info!("Restarted session {id}");
    Ok(Json(SessionView::from(&*session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(not_found(id));
    }
    state.resumes.remove(id).await;
    info!("Deleted session {id}");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state.sessions.get(id).await.ok_or_else(|| not_found(id))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

async fn read_resume_field(multipart: &mut Multipart) -> Result<ResumeUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| IngestionError::Malformed(e.to_string()))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let mime_type = match field.content_type() {
            Some(ct) if ct != "application/octet-stream" => ct.to_string(),
            _ => mime_from_file_name(field.file_name().unwrap_or_default()).to_string(),
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| IngestionError::Malformed(e.to_string()))?;

        return Ok(ResumeUpload { data, mime_type });
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{RESUME_FIELD}'"
    )))
}

fn mime_from_file_name(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".txt") {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}
