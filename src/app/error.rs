use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to write `{0}`")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML in `{0}`")]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("Failed to parse JSON in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("Unsupported config format `{0}` (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("Config file `{0}` does not exist")]
    NotFound(PathBuf),

    #[error("Unknown preset `{0}`")]
    UnknownPreset(String),

    #[error("`{0}` already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("Failed to serialize config as TOML")]
    SerializeToml(#[from] toml::ser::Error),

    #[error("Failed to serialize config as JSON")]
    SerializeJson(#[from] serde_json::Error),

    // No #[source]: the diagnostics are the whole message.
    #[error("{0}")]
    Invalid(Diagnostics),
}

/// One problem found while validating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Field the problem belongs to, e.g. `content[2]`.
    pub field: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

/// Every problem found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(Diagnostic {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was reported.
    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(self))
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.0.len() == 1 { "problem" } else { "problems" };
        write!(f, "Invalid config ({} {}):", self.0.len(), noun)?;
        for diag in self.iter() {
            write!(f, "\n  {}", diag)?;
        }
        Ok(())
    }
}
