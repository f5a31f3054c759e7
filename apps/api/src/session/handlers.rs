//! Axum route handlers for sessions, résumé versions, job postings,
//! settings, and export/import.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ModelId;
use crate::models::job::{CustomizationSettings, JobPosting, SettingsOverride};
use crate::models::resume::ResumeVersion;
use crate::session::registry::OracleSettingsView;
use crate::session::snapshot::SessionSnapshot;
use crate::session::store::SessionStore;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub oracle: OracleSettingsView,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConfigRequest {
    /// `Some("")` clears the credential; `None` leaves it unchanged.
    pub api_key: Option<String>,
    pub model: Option<ModelId>,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: ModelId,
    pub label: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SaveResumeRequest {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveJobRequest {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub job: JobPosting,
    pub analysis: Option<String>,
    pub settings: CustomizationSettings,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub stored: Option<SettingsOverride>,
    pub effective: CustomizationSettings,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub resume_versions: usize,
    pub job_postings: usize,
    pub job_analyses: usize,
    pub customization_settings: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/models
pub async fn handle_list_models() -> Json<Vec<ModelInfo>> {
    Json(
        ModelId::all()
            .iter()
            .map(|&id| ModelInfo {
                id,
                label: id.label(),
            })
            .collect(),
    )
}

/// POST /api/v1/sessions
///
/// Starts an empty session using the process-wide default credential and model.
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let oracle = state.config.default_oracle_settings();
    let view = OracleSettingsView::from(&oracle);
    let session_id = state.sessions.create(oracle).await;
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            oracle: view,
        }),
    )
}

/// DELETE /api/v1/sessions/:session_id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}

/// PUT /api/v1/sessions/:session_id/config
pub async fn handle_update_config(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<UpdateConfigRequest>,
) -> Result<Json<OracleSettingsView>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    if let Some(api_key) = request.api_key {
        let api_key = api_key.trim().to_string();
        session.oracle.api_key = (!api_key.is_empty()).then_some(api_key);
    }
    if let Some(model) = request.model {
        session.oracle.model = model;
    }
    Ok(Json(OracleSettingsView::from(&session.oracle)))
}

/// GET /api/v1/sessions/:session_id/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<ResumeVersion>>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let session = handle.lock().await;
    Ok(Json(session.store.list_resumes()))
}

/// PUT /api/v1/sessions/:session_id/resumes
pub async fn handle_save_resume(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SaveResumeRequest>,
) -> Result<Json<ResumeVersion>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    let saved = session.store.save_resume(&request.name, &request.text)?;
    Ok(Json(saved))
}

/// GET /api/v1/sessions/:session_id/resumes/:name
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path((session_id, name)): Path<(Uuid, String)>,
) -> Result<Json<ResumeVersion>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let session = handle.lock().await;
    let text = session
        .store
        .get_resume(&name)
        .ok_or_else(|| AppError::NotFound(format!("Résumé version '{name}' not found")))?;
    Ok(Json(ResumeVersion {
        name: name.clone(),
        text: text.to_string(),
    }))
}

/// DELETE /api/v1/sessions/:session_id/resumes/:name
///
/// Deleting an absent version is a no-op.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path((session_id, name)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    let handle = state.sessions.get(session_id).await?;
    handle.lock().await.store.delete_resume(&name);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/:session_id/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let session = handle.lock().await;
    Ok(Json(session.store.list_jobs()))
}

/// POST /api/v1/sessions/:session_id/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SaveJobRequest>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    let job = session.store.save_job(&request.title, &request.text)?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/sessions/:session_id/jobs/:job_id
///
/// Returns the posting together with its analysis and effective settings.
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path((session_id, job_id)): Path<(Uuid, String)>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let session = handle.lock().await;
    let job = session
        .store
        .get_job(&job_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Job posting '{job_id}' not found")))?;
    Ok(Json(JobDetailResponse {
        analysis: session.store.get_analysis(&job_id).map(str::to_string),
        settings: session.store.get_settings(&job_id),
        job,
    }))
}

/// DELETE /api/v1/sessions/:session_id/jobs/:job_id
///
/// Also removes the job's analysis and settings.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path((session_id, job_id)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    let handle = state.sessions.get(session_id).await?;
    handle.lock().await.store.delete_job(&job_id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/:session_id/jobs/:job_id/settings
pub async fn handle_get_settings(
    State(state): State<AppState>,
    Path((session_id, job_id)): Path<(Uuid, String)>,
) -> Result<Json<SettingsResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let session = handle.lock().await;
    if session.store.get_job(&job_id).is_none() {
        return Err(AppError::NotFound(format!("Job posting '{job_id}' not found")));
    }
    Ok(Json(settings_response(&session.store, &job_id)))
}

/// PUT /api/v1/sessions/:session_id/jobs/:job_id/settings
///
/// Replaces the stored settings; omitted fields fall back to defaults.
pub async fn handle_put_settings(
    State(state): State<AppState>,
    Path((session_id, job_id)): Path<(Uuid, String)>,
    Json(request): Json<SettingsOverride>,
) -> Result<Json<SettingsResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    session.store.set_settings(&job_id, request)?;
    Ok(Json(settings_response(&session.store, &job_id)))
}

/// GET /api/v1/sessions/:session_id/export
///
/// Served as a pretty-printed attachment so it can be saved and re-imported as-is.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let document = handle.lock().await.store.export().to_json_pretty()?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"resume_system_data.json\"",
            ),
        ],
        document,
    ))
}

/// POST /api/v1/sessions/:session_id/import
///
/// Replaces the session's store wholesale with the uploaded document.
pub async fn handle_import(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(snapshot): Json<SessionSnapshot>,
) -> Result<Json<ImportResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    session.store = SessionStore::import(snapshot);
    let imported = session.store.export();
    Ok(Json(ImportResponse {
        resume_versions: imported.resume_versions.len(),
        job_postings: imported.job_postings.len(),
        job_analyses: imported.job_analyses.len(),
        customization_settings: imported.customization_settings.len(),
    }))
}

fn settings_response(store: &SessionStore, job_id: &str) -> SettingsResponse {
    SettingsResponse {
        stored: store.get_settings_override(job_id).cloned(),
        effective: store.get_settings(job_id),
    }
}
