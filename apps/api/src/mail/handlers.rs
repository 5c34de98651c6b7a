//! Axum route handlers for the Mail API.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::mail::MailMessage;
use crate::state::AppState;

/// POST /mcp/email/send
pub async fn handle_send_email(
    State(state): State<AppState>,
    Json(message): Json<MailMessage>,
) -> Result<Json<Value>, AppError> {
    state
        .mailer
        .send(&message)
        .await
        .map_err(|e| AppError::Mail(format!("Failed to send email: {e}")))?;

    Ok(Json(json!({
        "status": "success",
        "message": "Email sent."
    })))
}
