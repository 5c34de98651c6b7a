pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::mail::handlers as mail;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/hello-azure", get(health::hello_handler))
        .route("/health", get(health::health_handler))
        .route("/api/chat", post(chat::handle_chat))
        .route("/mcp/email/send", post(mail::handle_send_email))
        .with_state(state)
}
