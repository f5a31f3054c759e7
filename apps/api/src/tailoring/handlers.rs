use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeVersion;
use crate::models::sections::{ResumeSections, SectionTarget};
use crate::session::store::SessionStore;
use crate::state::AppState;
use crate::tailoring::{analyzer, sections, tailor, OracleCall};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub job_id: String,
    pub analysis: String,
}

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub job_id: String,
    pub resume_names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TailoredResponse {
    pub text: String,
    pub revision: u64,
}

#[derive(Debug, Deserialize)]
pub struct SaveTailoredRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SectionsResponse {
    pub sections: ResumeSections,
    /// The breakdown was derived from an older tailored result.
    pub stale: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReviseSectionRequest {
    pub target: SectionTarget,
    pub feedback: String,
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct ReviseSectionResponse {
    pub target: SectionTarget,
    pub content: String,
    pub sections: ResumeSections,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:session_id/jobs/:job_id/analyze
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Path((session_id, job_id)): Path<(Uuid, String)>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    let call = OracleCall::new(state.oracle.as_ref(), &session.oracle);

    let analysis = analyzer::analyze_job(&mut session.store, &call, &job_id).await?;
    Ok(Json(AnalysisResponse { job_id, analysis }))
}

/// POST /api/v1/sessions/:session_id/tailor
///
/// Replaces the session's tailored result on success.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailoredResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    let call = OracleCall::new(state.oracle.as_ref(), &session.oracle);

    tailor::tailor_resume(
        &mut session.store,
        &call,
        &request.job_id,
        &request.resume_names,
    )
    .await?;
    current_tailored(&session.store)
}

/// GET /api/v1/sessions/:session_id/tailored
pub async fn handle_get_tailored(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<TailoredResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let session = handle.lock().await;
    current_tailored(&session.store)
}

/// POST /api/v1/sessions/:session_id/tailored/save
pub async fn handle_save_tailored(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SaveTailoredRequest>,
) -> Result<Json<ResumeVersion>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    let saved = tailor::save_tailored_as(&mut session.store, &request.name)?;
    Ok(Json(saved))
}

/// POST /api/v1/sessions/:session_id/sections/split
pub async fn handle_split_sections(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SectionsResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    let call = OracleCall::new(state.oracle.as_ref(), &session.oracle);

    let sections = sections::split_sections(&mut session.store, &call).await?;
    Ok(Json(SectionsResponse {
        sections,
        stale: false,
    }))
}

/// GET /api/v1/sessions/:session_id/sections
pub async fn handle_get_sections(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SectionsResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let session = handle.lock().await;
    let sections = session
        .store
        .get_sections()
        .cloned()
        .ok_or_else(|| AppError::NotFound("No section breakdown exists yet".to_string()))?;
    Ok(Json(SectionsResponse {
        sections,
        stale: session.store.sections_are_stale(),
    }))
}

/// POST /api/v1/sessions/:session_id/sections/revise
pub async fn handle_revise_section(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ReviseSectionRequest>,
) -> Result<Json<ReviseSectionResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    let call = OracleCall::new(state.oracle.as_ref(), &session.oracle);

    let content = sections::revise_stored_section(
        &mut session.store,
        &call,
        request.target,
        &request.feedback,
        &request.job_id,
    )
    .await?;
    let sections = session
        .store
        .get_sections()
        .cloned()
        .ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Section breakdown vanished after revision"))
        })?;
    Ok(Json(ReviseSectionResponse {
        target: request.target,
        content,
        sections,
    }))
}

/// POST /api/v1/sessions/:session_id/sections/reconstruct
pub async fn handle_reconstruct(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<TailoredResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    let call = OracleCall::new(state.oracle.as_ref(), &session.oracle);

    sections::reconstruct_resume(&mut session.store, &call).await?;
    current_tailored(&session.store)
}

fn current_tailored(store: &SessionStore) -> Result<Json<TailoredResponse>, AppError> {
    let tailored = store
        .tailored()
        .ok_or_else(|| AppError::NotFound("No tailored result exists yet".to_string()))?;
    Ok(Json(TailoredResponse {
        text: tailored.text.clone(),
        revision: tailored.revision,
    }))
}
