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
use crate::evaluation::matching::{calculate_skill_match, SkillMatch};
use crate::evaluation::models::{EvaluationRequest, FinalReport};
use crate::evaluation::panel::run_panel_evaluation;
use crate::evaluation::report::build_final_report;
use crate::extraction::{detect_kind, extract_resume_text};
use crate::sessions::InterviewSession;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub resume_chars: usize,
    pub expires_in_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptUpdate {
    pub transcript: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatchRequest {
    pub candidate_skills: Vec<String>,
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub priority_skills: Vec<String>,
}

async fn evaluate(state: &AppState, request: EvaluationRequest) -> Result<FinalReport, AppError> {
    let panel = run_panel_evaluation(state.llm.clone(), request, &state.panel).await?;
    Ok(build_final_report(&panel))
}

/// POST /api/v1/evaluations
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluationRequest>,
) -> Result<Json<FinalReport>, AppError> {
    Ok(Json(evaluate(&state, req).await?))
}

/// POST /api/v1/sessions
/// Multipart fields: `resume` (file), `job_description`, optional `transcript`.
pub async fn handle_create_session(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let mut resume_file: Option<(Option<String>, Option<String>, Bytes)> = None;
    let mut job_description = String::new();
    let mut transcript = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                resume_file = Some((content_type, file_name, data));
            }
            "job_description" | "jobDescription" => {
                job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job_description: {e}")))?;
            }
            "transcript" => {
                transcript = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid transcript: {e}")))?;
            }
            _ => {}
        }
    }

    let (content_type, file_name, data) = resume_file
        .ok_or_else(|| AppError::Validation("Missing 'resume' file field".to_string()))?;
    let kind = detect_kind(content_type.as_deref(), file_name.as_deref())?;
    let resume = extract_resume_text(kind, data).await?;

    let session = InterviewSession::new(resume, job_description, transcript);
    session.to_request().validate()?;
    state.sessions.create(&session).await?;

    let resume_chars = session.resume.chars().count();
    info!(session_id = %session.id, resume_chars, "Session created");

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id,
            resume_chars,
            expires_in_secs: state.sessions.ttl().as_secs(),
        }),
    ))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewSession>, AppError> {
    Ok(Json(state.sessions.get(id).await?))
}

/// PUT /api/v1/sessions/:id/transcript
pub async fn handle_set_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TranscriptUpdate>,
) -> Result<StatusCode, AppError> {
    state.sessions.set_transcript(id, req.transcript).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/evaluate
pub async fn handle_evaluate_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FinalReport>, AppError> {
    let session = state.sessions.get(id).await?;
    info!(session_id = %id, "Evaluating session");
    Ok(Json(evaluate(&state, session.to_request()).await?))
}

/// POST /api/v1/skill-match
pub async fn handle_skill_match(Json(req): Json<SkillMatchRequest>) -> Json<SkillMatch> {
    Json(calculate_skill_match(
        &req.candidate_skills,
        &req.required_skills,
        &req.priority_skills,
    ))
}
