pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::session::handlers as session;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/models", get(session::handle_list_models))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:session_id",
            delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:session_id/config",
            put(session::handle_update_config),
        )
        // Résumé versions
        .route(
            "/api/v1/sessions/:session_id/resumes",
            get(session::handle_list_resumes).put(session::handle_save_resume),
        )
        .route(
            "/api/v1/sessions/:session_id/resumes/:name",
            get(session::handle_get_resume).delete(session::handle_delete_resume),
        )
        // Job postings
        .route(
            "/api/v1/sessions/:session_id/jobs",
            get(session::handle_list_jobs).post(session::handle_create_job),
        )
        .route(
            "/api/v1/sessions/:session_id/jobs/:job_id",
            get(session::handle_get_job).delete(session::handle_delete_job),
        )
        .route(
            "/api/v1/sessions/:session_id/jobs/:job_id/settings",
            get(session::handle_get_settings).put(session::handle_put_settings),
        )
        .route(
            "/api/v1/sessions/:session_id/jobs/:job_id/analyze",
            post(tailoring::handle_analyze_job),
        )
        // Tailoring
        .route(
            "/api/v1/sessions/:session_id/tailor",
            post(tailoring::handle_tailor),
        )
        .route(
            "/api/v1/sessions/:session_id/tailored",
            get(tailoring::handle_get_tailored),
        )
        .route(
            "/api/v1/sessions/:session_id/tailored/save",
            post(tailoring::handle_save_tailored),
        )
        // Sections
        .route(
            "/api/v1/sessions/:session_id/sections",
            get(tailoring::handle_get_sections),
        )
        .route(
            "/api/v1/sessions/:session_id/sections/split",
            post(tailoring::handle_split_sections),
        )
        .route(
            "/api/v1/sessions/:session_id/sections/revise",
            post(tailoring::handle_revise_section),
        )
        .route(
            "/api/v1/sessions/:session_id/sections/reconstruct",
            post(tailoring::handle_reconstruct),
        )
        // Export / import
        .route(
            "/api/v1/sessions/:session_id/export",
            get(session::handle_export),
        )
        .route(
            "/api/v1/sessions/:session_id/import",
            post(session::handle_import),
        )
        .with_state(state)
}
