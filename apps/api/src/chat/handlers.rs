//! Axum route handlers for the Chat API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::chat::router::answer;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChatRequest {
    #[serde(alias = "question")]
    pub question: String,
    #[serde(alias = "model", default)]
    pub model: Option<String>,
}

/// POST /api/chat
///
/// Answers a free-text question about the CV as plain text. Upstream model failures are
/// part of the answer text, not an error status.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<String, AppError> {
    let document = state.document.as_deref().ok_or_else(|| {
        AppError::DocumentUnavailable(
            "CV data not loaded. Check if the CV file exists and is readable.".to_string(),
        )
    })?;
    if document.name.is_none() {
        return Err(AppError::DocumentUnavailable(
            "Name not found in CV. Check PDF content and parsing logic.".to_string(),
        ));
    }

    let model = req
        .model
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(&state.config.default_model);

    answer(
        document,
        state.completer.as_deref(),
        &state.config.featured_employer,
        &req.question,
        model,
    )
    .await
}
