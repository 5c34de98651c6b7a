mod chat;
mod config;
mod document;
mod errors;
mod llm_client;
mod mail;
mod routes;
mod secrets;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{Completer, OpenRouterClient};
use crate::mail::MailRelay;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvbot v{}", env!("CARGO_PKG_VERSION"));

    // Load the CV once; it stays read-only for the life of the process
    let document = document::load_store(&config.cv_path);

    // Initialize completion client from the secrets file
    let completer = build_completer(&config)?;

    let mailer = Arc::new(MailRelay::new(config.smtp.clone()));
    info!(
        "Mail relay: {}:{} (ssl={}, auth={})",
        config.smtp.host,
        config.smtp.port,
        config.smtp.ssl,
        config.smtp.credentials().is_some()
    );

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .context("CORS_ORIGIN must be a valid header value")?,
        )
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState {
        document,
        completer,
        mailer,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// A missing key only disables the model fallback; direct lookups keep working.
fn build_completer(config: &Config) -> Result<Option<Arc<dyn Completer>>> {
    let api_key = match secrets::load_api_key(&config.secrets_path) {
        Ok(key) => key,
        Err(e) => {
            warn!("Completion client disabled: {e}");
            return Ok(None);
        }
    };

    let client = OpenRouterClient::new(
        api_key,
        config.openrouter_endpoint.clone(),
        config.llm_timeout_secs.map(Duration::from_secs),
    )
    .context("Failed to build HTTP client")?;

    info!(
        "Completion client initialized (endpoint: {}, default model: {})",
        config.openrouter_endpoint, config.default_model
    );
    Ok(Some(Arc::new(client)))
}
