use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_MODEL, OPENROUTER_API_URL};

/// Application configuration loaded from environment variables.
/// Everything has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub cv_path: PathBuf,
    pub secrets_path: PathBuf,
    pub openrouter_endpoint: String,
    pub default_model: String,
    pub llm_timeout_secs: Option<u64>,
    /// Employer literal the experience lookup singles out.
    pub featured_employer: String,
    pub cors_origin: String,
    pub smtp: SmtpConfig,
}

/// SMTP relay settings. Defaults to an unauthenticated plain relay on localhost:25.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub ssl: bool,
    pub from_address: String,
    pub from_name: String,
}

impl SmtpConfig {
    /// Credentials are only used when both halves are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.user.as_deref(), self.pass.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25,
            user: None,
            pass: None,
            ssl: false,
            from_address: "cv-assistant@localhost".to_string(),
            from_name: "CV MCP Server".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let smtp_defaults = SmtpConfig::default();

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
            cv_path: PathBuf::from(env_or("CV_PATH", "Associate CV.pdf")),
            secrets_path: PathBuf::from(env_or("SECRETS_PATH", ".env")),
            openrouter_endpoint: env_or("OPENROUTER_ENDPOINT", OPENROUTER_API_URL),
            default_model: env_or("DEFAULT_MODEL", DEFAULT_MODEL),
            llm_timeout_secs: optional_env("LLM_TIMEOUT_SECS")
                .map(|v| {
                    v.parse::<u64>()
                        .context("LLM_TIMEOUT_SECS must be a whole number of seconds")
                })
                .transpose()?,
            featured_employer: env_or("FEATURED_EMPLOYER", "ceylon electricity board")
                .to_lowercase(),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:3000"),
            smtp: SmtpConfig {
                host: env_or("SMTP_HOST", &smtp_defaults.host),
                port: parse_env("SMTP_PORT", smtp_defaults.port)?,
                user: optional_env("SMTP_USER"),
                pass: optional_env("SMTP_PASS"),
                ssl: optional_env("SMTP_SSL")
                    .map(|v| parse_flag(&v))
                    .unwrap_or(false),
                from_address: env_or("MAIL_FROM", &smtp_defaults.from_address),
                from_name: env_or("MAIL_FROM_NAME", &smtp_defaults.from_name),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env(key: &str, default: u16) -> Result<u16> {
    match optional_env(key) {
        Some(v) => v
            .trim()
            .parse::<u16>()
            .with_context(|| format!("{key} must be a valid port number")),
        None => Ok(default),
    }
}

/// Anything but a case-insensitive "true" is false.
fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
