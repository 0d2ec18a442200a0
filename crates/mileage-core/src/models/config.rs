//! Configuration structures for the mileage tools.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides `upload.max_file_size`.
pub const MAX_FILE_SIZE_ENV: &str = "MILEAGE_MAX_FILE_SIZE";

/// Main configuration, built once at startup and passed to the service layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MileageConfig {
    /// Document upload configuration.
    pub upload: UploadConfig,

    /// Record store configuration.
    pub store: StoreConfig,

    /// Gap workflow configuration.
    pub gaps: GapConfig,

    /// Caller identity defaults.
    pub user: UserConfig,
}

/// Document upload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted document in bytes.
    pub max_file_size: u64,

    /// Lowercase file extensions accepted for upload.
    pub accepted_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            accepted_extensions: vec!["pdf".to_string(), "txt".to_string()],
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding trips, gaps and uploads. Resolved by the caller when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

/// Gap workflow configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    /// Drop detected gaps whose date already has a stored gap.
    pub skip_known_dates: bool,
}

/// Caller identity defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// User id used when none is given explicitly.
    pub default_user: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            default_user: "local".to_string(),
        }
    }
}

impl MileageConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), crate::error::MileageError> {
        if let Ok(value) = std::env::var(MAX_FILE_SIZE_ENV) {
            self.upload.max_file_size = value.trim().parse().map_err(|_| {
                crate::error::MileageError::Config(format!(
                    "{} must be a byte count, got {:?}",
                    MAX_FILE_SIZE_ENV, value
                ))
            })?;
        }
        Ok(())
    }

    /// Whether a file extension is accepted for upload.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.upload
            .accepted_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MileageConfig::default();
        assert_eq!(config.upload.max_file_size, 10_485_760);
        assert!(config.accepts_extension("PDF"));
        assert!(!config.accepts_extension("docx"));
        assert!(!config.gaps.skip_known_dates);
        assert_eq!(config.user.default_user, "local");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: MileageConfig =
            serde_json::from_str(r#"{ "gaps": { "skip_known_dates": true } }"#).unwrap();
        assert!(config.gaps.skip_known_dates);
        assert_eq!(config.upload.accepted_extensions, vec!["pdf", "txt"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = MileageConfig::default();
        config.user.default_user = "alice".to_string();
        config.save(&path).unwrap();

        let loaded = MileageConfig::from_file(&path).unwrap();
        assert_eq!(loaded.user.default_user, "alice");
    }
}
