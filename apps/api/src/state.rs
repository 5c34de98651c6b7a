use std::sync::Arc;

use crate::config::Config;
use crate::document::ParsedDocument;
use crate::llm_client::Completer;
use crate::mail::Mailer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The CV, loaded once at startup. `None` when loading failed.
    pub document: Option<Arc<ParsedDocument>>,
    /// Fallback answerer. `None` when the API key could not be loaded.
    pub completer: Option<Arc<dyn Completer>>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
}
