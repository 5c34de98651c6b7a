use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`;
/// every variant renders as an `application/problem+json` body.
#[derive(Debug, Error)]
pub enum AppError {
    /// The CV was not loaded at startup, or has no name.
    #[error("Document unavailable: {0}")]
    DocumentUnavailable(String),

    #[error("Completion unavailable: {0}")]
    CompletionUnavailable(String),

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            AppError::DocumentUnavailable(msg) => {
                tracing::error!("{msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DOCUMENT_UNAVAILABLE",
                    msg.clone(),
                )
            }
            AppError::CompletionUnavailable(msg) => {
                tracing::error!("Completion unavailable: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMPLETION_UNAVAILABLE",
                    msg.clone(),
                )
            }
            AppError::Mail(msg) => {
                tracing::error!("Mail error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "MAIL_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "type": PROBLEM_TYPE,
            "title": status.canonical_reason().unwrap_or("Error"),
            "status": status.as_u16(),
            "detail": detail,
            "code": code
        }));

        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            body,
        )
            .into_response()
    }
}

/// 500 Internal Server Error, RFC 9110.
const PROBLEM_TYPE: &str = "https://tools.ietf.org/html/rfc9110#section-15.6.1";
