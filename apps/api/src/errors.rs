use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is recoverable: a failed operation never leaves a session
/// unusable, and nothing is retried automatically.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required input is missing or empty. The user must correct it.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No oracle credential is configured for the session.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The completion endpoint answered with a non-success status, or could not
    /// be reached at all (`status` is `None`).
    #[error("Remote error (status {}): {body}", display_status(.status))]
    Remote { status: Option<u16>, body: String },

    /// The oracle's response did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential => AppError::Configuration(
                "No API key is configured. Set one for this session first.".to_string(),
            ),
            LlmError::Api { status, body } => AppError::Remote {
                status: Some(status),
                body,
            },
            LlmError::Http(e) => AppError::Remote {
                status: e.status().map(|s| s.as_u16()),
                body: e.to_string(),
            },
            LlmError::Parse(e) => AppError::Parse(format!("Unexpected response payload: {e}")),
            LlmError::EmptyContent => {
                AppError::Parse("Response contained no text content block".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details): (StatusCode, &str, String, Option<Value>) =
            match &self {
                AppError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                AppError::Configuration(msg) => (
                    StatusCode::PRECONDITION_FAILED,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                    None,
                ),
                AppError::Remote { status, body } => {
                    tracing::error!("Remote completion error: status={status:?}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "REMOTE_ERROR",
                        "The completion service returned an error".to_string(),
                        Some(json!({ "status": status, "body": body })),
                    )
                }
                AppError::Parse(msg) => {
                    tracing::warn!("Parse error: {msg}");
                    (StatusCode::BAD_GATEWAY, "PARSE_ERROR", msg.clone(), None)
                }
                AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
                AppError::Internal(e) => {
                    tracing::error!("Internal error: {e:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                        None,
                    )
                }
            };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
