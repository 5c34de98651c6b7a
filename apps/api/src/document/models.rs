use serde::{Deserialize, Serialize};

/// Structured view of the single résumé served by this process.
/// Field names serialize in PascalCase; the fallback prompt refers to them by those names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ParsedDocument {
    pub name: Option<String>,
    pub email: Option<String>,
    pub skills: Vec<String>,
    pub educations: Vec<Education>,
    pub experiences: Vec<Experience>,
    pub competitions: Vec<String>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub period: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub period: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Project {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParsedDocument {
    /// True when parsing produced nothing usable at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.skills.is_empty()
            && self.educations.is_empty()
            && self.experiences.is_empty()
            && self.competitions.is_empty()
            && self.projects.is_empty()
    }
}

impl Education {
    pub fn summary(&self) -> String {
        format!("{} at {} ({})", self.degree, self.institution, self.period)
    }
}

impl Experience {
    pub fn summary(&self) -> String {
        format!("{} at {} ({})", self.role, self.company, self.period)
    }
}
