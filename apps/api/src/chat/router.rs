//! Question Router: keyword-first, model-fallback dispatcher.
//!
//! Direct lookups are tried in a fixed priority order and the first keyword hit wins:
//! name, email, skill, education, experience/work/featured employer, competition, project.
//! Questions matching none of them go to the completion model with the whole CV as context.

use tracing::{debug, warn};

use crate::chat::prompts::{CV_ANSWER_PROMPT, CV_ANSWER_SYSTEM, NOT_FOUND};
use crate::document::ParsedDocument;
use crate::errors::AppError;
use crate::llm_client::Completer;

/// A direct field lookup against the CV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Name,
    Email,
    Skills,
    Education,
    Experience,
    Competitions,
    Projects,
}

/// Picks the lookup for a question, or `None` when the model has to answer it.
/// `featured_employer` must already be lowercase.
pub fn classify(question: &str, featured_employer: &str) -> Option<Lookup> {
    let q = question.to_lowercase();
    let mentions_employer = !featured_employer.is_empty() && q.contains(featured_employer);

    if q.contains("name") {
        Some(Lookup::Name)
    } else if q.contains("email") {
        Some(Lookup::Email)
    } else if q.contains("skill") {
        Some(Lookup::Skills)
    } else if q.contains("education") {
        Some(Lookup::Education)
    } else if q.contains("experience") || q.contains("work") || mentions_employer {
        Some(Lookup::Experience)
    } else if q.contains("competition") {
        Some(Lookup::Competitions)
    } else if q.contains("project") {
        Some(Lookup::Projects)
    } else {
        None
    }
}

/// Renders one CV field as answer text. Empty fields render as `Not found in CV.`
pub fn render(lookup: Lookup, doc: &ParsedDocument, featured_employer: &str) -> String {
    match lookup {
        Lookup::Name => or_not_found(doc.name.clone()),
        Lookup::Email => or_not_found(doc.email.clone()),
        Lookup::Skills => join_or_not_found(doc.skills.iter().cloned(), ", "),
        Lookup::Education => join_or_not_found(doc.educations.iter().map(|e| e.summary()), "; "),
        Lookup::Experience => {
            let featured = (!featured_employer.is_empty())
                .then(|| {
                    doc.experiences
                        .iter()
                        .find(|e| e.company.to_lowercase().contains(featured_employer))
                })
                .flatten();
            match featured {
                Some(exp) => exp.summary(),
                None => join_or_not_found(doc.experiences.iter().map(|e| e.summary()), "; "),
            }
        }
        Lookup::Competitions => join_or_not_found(doc.competitions.iter().cloned(), ", "),
        Lookup::Projects => join_or_not_found(doc.projects.iter().map(|p| p.name.clone()), "; "),
    }
}

/// Answers a question about `doc`.
///
/// Completion failures are returned as answer text, not as errors; the only errors are a
/// missing completion client and a CV that cannot be serialized.
pub async fn answer(
    doc: &ParsedDocument,
    completer: Option<&dyn Completer>,
    featured_employer: &str,
    question: &str,
    model: &str,
) -> Result<String, AppError> {
    if let Some(lookup) = classify(question, featured_employer) {
        debug!("Answering {lookup:?} lookup directly from CV");
        return Ok(render(lookup, doc, featured_employer));
    }

    let completer = completer.ok_or_else(|| {
        AppError::CompletionUnavailable(
            "Completion client is not configured. Check the OPENROUTER_API_KEY secrets file."
                .to_string(),
        )
    })?;

    let cv_json = serde_json::to_string_pretty(doc)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize CV: {e}")))?;
    let prompt = CV_ANSWER_PROMPT
        .replace("{cv_json}", &cv_json)
        .replace("{question}", question);

    debug!("No keyword match; asking model {model}");
    match completer.ask(model, CV_ANSWER_SYSTEM, &prompt).await {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!("Completion failed: {e}");
            Ok(e.to_string())
        }
    }
}

fn or_not_found(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_FOUND.to_string())
}

fn join_or_not_found(items: impl Iterator<Item = String>, separator: &str) -> String {
    let items: Vec<String> = items.collect();
    if items.is_empty() {
        NOT_FOUND.to_string()
    } else {
        items.join(separator)
    }
}
