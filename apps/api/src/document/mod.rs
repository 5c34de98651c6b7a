// Document store: the single résumé this process answers questions about.
// Loaded once at startup and shared read-only behind an `Arc`.

pub mod models;
pub mod parser;

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

pub use models::ParsedDocument;

/// Loads the CV for the lifetime of the process.
/// Failures are logged and leave the store empty; chat requests then answer with a Problem.
pub fn load_store(path: &Path) -> Option<Arc<ParsedDocument>> {
    match parser::load_document(path) {
        Ok(doc) if doc.is_empty() => {
            warn!("CV at {} parsed but no fields were recognised", path.display());
            None
        }
        Ok(doc) => {
            info!(
                "CV loaded from {}: name={} skills={} educations={} experiences={} projects={}",
                path.display(),
                doc.name.is_some(),
                doc.skills.len(),
                doc.educations.len(),
                doc.experiences.len(),
                doc.projects.len()
            );
            Some(Arc::new(doc))
        }
        Err(parser::DocumentError::NotFound(p)) => {
            warn!("CV file {} does not exist; chat is unavailable", p.display());
            None
        }
        Err(e) => {
            error!("Failed to load CV: {e}");
            None
        }
    }
}
