//! Local secrets file. Only `OPENROUTER_API_KEY` is read from it.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";

#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("secrets file not found: {0}")]
    Missing(PathBuf),

    #[error("OPENROUTER_API_KEY not found in {0}")]
    KeyNotFound(PathBuf),

    #[error("failed to read secrets file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Reads the completion API key from a key=value file without touching the process environment.
pub fn load_api_key(path: &Path) -> Result<String, SecretsError> {
    if !path.exists() {
        return Err(SecretsError::Missing(path.to_path_buf()));
    }

    let entries = dotenvy::from_path_iter(path).map_err(|source| SecretsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let (key, value) = entry.map_err(|source| SecretsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if key == API_KEY_VAR {
            let value = value.trim();
            if value.is_empty() {
                break;
            }
            return Ok(value.to_string());
        }
    }

    Err(SecretsError::KeyNotFound(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn secrets_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_key_among_other_entries() {
        let file = secrets_file("OTHER=1\nOPENROUTER_API_KEY=sk-or-test  \nSMTP_HOST=mail\n");
        assert_eq!(load_api_key(file.path()).unwrap(), "sk-or-test");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_api_key(&dir.path().join(".env")).unwrap_err();
        assert!(matches!(err, SecretsError::Missing(_)));
    }

    #[test]
    fn test_missing_key() {
        let file = secrets_file("SMTP_HOST=mail\n");
        let err = load_api_key(file.path()).unwrap_err();
        assert!(matches!(err, SecretsError::KeyNotFound(_)));
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn test_empty_key_is_missing() {
        let file = secrets_file("OPENROUTER_API_KEY=\n");
        assert!(matches!(
            load_api_key(file.path()),
            Err(SecretsError::KeyNotFound(_))
        ));
    }
}
