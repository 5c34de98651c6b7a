//! CV loader: turns the résumé file on disk into a `ParsedDocument`.
//!
//! `.json` files are read as-is. Anything else is treated as a PDF: the text layer is
//! extracted with `pdf-extract` and split into sections by heading lines.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::document::models::{Education, Experience, ParsedDocument, Project};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("CV file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CV JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("no text could be extracted from {0}")]
    Empty(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Skills,
    Education,
    Experience,
    Competitions,
    Projects,
    /// A recognised heading whose content is not kept.
    Ignored,
}

const BULLETS: &[char] = &['•', '●', '▪', '◦', '·', '-', '*', '–'];

/// Loads the CV at `path`. Called once at startup.
pub fn load_document(path: &Path) -> Result<ParsedDocument, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let raw = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(serde_json::from_str(&raw)?);
    }

    let text = pdf_extract::extract_text(path).map_err(|e| DocumentError::Pdf(e.to_string()))?;
    if text.trim().is_empty() {
        return Err(DocumentError::Empty(path.to_path_buf()));
    }
    debug!("Extracted {} characters of CV text", text.len());

    Ok(parse_cv_text(&text))
}

/// Heuristic section parser over plain CV text.
pub fn parse_cv_text(text: &str) -> ParsedDocument {
    let mut doc = ParsedDocument::default();
    let mut section: Option<Section> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if doc.email.is_none() {
            doc.email = find_email(line);
        }

        if let Some(next) = heading(line) {
            section = Some(next);
            continue;
        }

        let Some(current) = section else {
            // Header block: first plain line is the name.
            if doc.name.is_none() && !line.contains('@') {
                doc.name = Some(line.to_string());
            }
            continue;
        };

        let item = strip_bullet(line);
        if item.is_empty() {
            continue;
        }

        match current {
            Section::Skills => doc.skills.extend(split_list(item)),
            Section::Competitions => doc.competitions.extend(split_list(item)),
            Section::Education => {
                let (degree, institution, period) = split_entry(item);
                doc.educations.push(Education {
                    degree,
                    institution,
                    period,
                });
            }
            Section::Experience => {
                let (role, company, period) = split_entry(item);
                doc.experiences.push(Experience {
                    role,
                    company,
                    period,
                });
            }
            Section::Projects => doc.projects.push(split_project(item)),
            Section::Ignored => {}
        }
    }

    doc
}

fn heading(line: &str) -> Option<Section> {
    let normalized = line.trim_end_matches(':').trim().to_uppercase();
    let section = match normalized.as_str() {
        "SKILLS" | "TECHNICAL SKILLS" | "KEY SKILLS" => Section::Skills,
        "EDUCATION" => Section::Education,
        "EXPERIENCE" | "WORK EXPERIENCE" | "PROFESSIONAL EXPERIENCE" | "EMPLOYMENT" => {
            Section::Experience
        }
        "COMPETITIONS" | "ACHIEVEMENTS" | "COMPETITIONS & ACHIEVEMENTS" => Section::Competitions,
        "PROJECTS" => Section::Projects,
        "SUMMARY" | "PROFILE" | "CONTACT" | "REFERENCES" | "CERTIFICATIONS" | "INTERESTS" => {
            Section::Ignored
        }
        _ => return None,
    };
    Some(section)
}

fn find_email(line: &str) -> Option<String> {
    line.split_whitespace()
        .map(|token| {
            let token = token.strip_prefix("mailto:").unwrap_or(token);
            token.trim_matches(|c: char| !(c.is_alphanumeric() || "@._-+".contains(c)))
        })
        .find(|token| {
            token
                .split_once('@')
                .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'))
        })
        .map(|token| token.trim_end_matches('.').to_string())
}

fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(BULLETS).trim()
}

fn split_list(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// `A | B | C`, else `A at B (C)`, else the whole line as `A`.
fn split_entry(line: &str) -> (String, String, String) {
    if line.contains('|') {
        let mut parts = line.split('|').map(str::trim);
        let first = parts.next().unwrap_or_default().to_string();
        let second = parts.next().unwrap_or_default().to_string();
        let rest: Vec<&str> = parts.collect();
        return (first, second, rest.join(" | "));
    }

    if let Some((first, rest)) = line.split_once(" at ") {
        let rest = rest.trim();
        if let (Some(open), true) = (rest.rfind('('), rest.ends_with(')')) {
            return (
                first.trim().to_string(),
                rest[..open].trim().to_string(),
                rest[open + 1..rest.len() - 1].trim().to_string(),
            );
        }
        return (first.trim().to_string(), rest.to_string(), String::new());
    }

    (line.to_string(), String::new(), String::new())
}

fn split_project(line: &str) -> Project {
    let split = line.split_once(" - ").or_else(|| line.split_once(": "));
    match split {
        Some((name, description)) => Project {
            name: name.trim().to_string(),
            description: Some(description.trim().to_string()).filter(|d| !d.is_empty()),
        },
        None => Project {
            name: line.to_string(),
            description: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CV: &str = "
        Jane Doe
        +94 77 123 4567 | mailto:jane.doe@example.com | Colombo

        SUMMARY
        Electrical engineering undergraduate.

        Skills:
        • Rust, Python, MATLAB
        • Power Systems

        EDUCATION
        BSc Electrical Engineering | University of Moratuwa | 2020 - 2024

        Work Experience
        - Trainee Engineer at Ceylon Electricity Board (2023)
        - Intern | Acme Corp | Summer 2022

        COMPETITIONS
        IEEEXtreme 16.0, Robofest 2022

        PROJECTS
        Grid Monitor - IoT dashboard for substations
        Line Follower
    ";

    #[test]
    fn test_parse_sample_cv() {
        let doc = parse_cv_text(SAMPLE_CV);

        assert_eq!(doc.name.as_deref(), Some("Jane Doe"));
        assert_eq!(doc.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(doc.skills, vec!["Rust", "Python", "MATLAB", "Power Systems"]);
        assert_eq!(
            doc.educations,
            vec![Education {
                degree: "BSc Electrical Engineering".to_string(),
                institution: "University of Moratuwa".to_string(),
                period: "2020 - 2024".to_string(),
            }]
        );
        assert_eq!(doc.experiences.len(), 2);
        assert_eq!(doc.experiences[0].company, "Ceylon Electricity Board");
        assert_eq!(doc.experiences[0].period, "2023");
        assert_eq!(doc.experiences[1].role, "Intern");
        assert_eq!(doc.competitions, vec!["IEEEXtreme 16.0", "Robofest 2022"]);
        assert_eq!(doc.projects[0].name, "Grid Monitor");
        assert_eq!(
            doc.projects[0].description.as_deref(),
            Some("IoT dashboard for substations")
        );
        assert_eq!(doc.projects[1].name, "Line Follower");
    }

    #[test]
    fn test_ignored_section_is_skipped() {
        let doc = parse_cv_text("Jane Doe\nREFERENCES\nDr. Smith, Moratuwa\n");
        assert!(doc.skills.is_empty());
        assert!(doc.competitions.is_empty());
    }

    #[test]
    fn test_no_name_when_text_starts_with_section() {
        let doc = parse_cv_text("SKILLS\nRust\n");
        assert!(doc.name.is_none());
        assert_eq!(doc.skills, vec!["Rust"]);
    }

    #[test]
    fn test_split_entry_fallbacks() {
        assert_eq!(
            split_entry("Engineer at Acme"),
            ("Engineer".to_string(), "Acme".to_string(), String::new())
        );
        assert_eq!(
            split_entry("Volunteer"),
            ("Volunteer".to_string(), String::new(), String::new())
        );
    }

    #[test]
    fn test_load_json_document() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"Name": "Jane Doe", "Skills": ["Rust"]}"#)
            .unwrap();

        let doc = load_document(file.path()).unwrap();
        assert_eq!(doc.name.as_deref(), Some("Jane Doe"));
        assert_eq!(doc.skills, vec!["Rust"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("Associate CV.pdf")).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
    }
}
