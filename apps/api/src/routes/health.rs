use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /hello-azure
/// Plain-text liveness probe kept for the existing deployment checks.
pub async fn hello_handler() -> &'static str {
    "hello azure"
}

/// GET /health
/// Returns a simple status object with service version and whether the CV is loaded.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cvbot",
        "document_loaded": state.document.is_some(),
        "completion_configured": state.completer.is_some()
    }))
}
