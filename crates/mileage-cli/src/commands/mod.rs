//! Subcommands and the state they share.

pub mod config;
pub mod extract;
pub mod gaps;
pub mod summary;
pub mod trips;
pub mod upload;

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::debug;

use mileage_core::error::ValidationError;
use mileage_core::models::config::MileageConfig;
use mileage_core::{JsonFileStore, MileageService};

/// Global options given before the subcommand.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub config_path: Option<PathBuf>,
    pub user: Option<String>,
    pub store_path: Option<PathBuf>,
}

/// An opened store plus the identity every operation runs as.
pub struct Session {
    pub service: MileageService<JsonFileStore>,
    pub user_id: String,
}

impl Context {
    /// Config file in use: `--config`, or the per-user default.
    pub fn config_file(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(config::default_config_path)
    }

    /// Load configuration. A missing default file means defaults; a missing
    /// explicit `--config` file is an error.
    pub fn load_config(&self) -> anyhow::Result<MileageConfig> {
        let mut config = match &self.config_path {
            Some(path) => MileageConfig::from_file(path)
                .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?,
            None => {
                let path = config::default_config_path();
                if path.exists() {
                    MileageConfig::from_file(&path)?
                } else {
                    MileageConfig::default()
                }
            }
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Open the record store and build the service.
    pub fn open_session(&self) -> anyhow::Result<Session> {
        let config = self.load_config()?;
        let user_id = self
            .user
            .clone()
            .unwrap_or_else(|| config.user.default_user.clone());

        if user_id.trim().is_empty() {
            anyhow::bail!("No user given. Pass --user or set user.default_user.");
        }

        let store_path = self
            .store_path
            .clone()
            .or_else(|| config.store.data_file.clone())
            .unwrap_or_else(default_store_path);
        debug!("Using store {} as {}", store_path.display(), user_id);

        let store = JsonFileStore::open(&store_path)?;
        Ok(Session {
            service: MileageService::new(store, config),
            user_id,
        })
    }
}

/// Default location of the record file.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mileage")
        .join("store.json")
}

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()).to_string())
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Write `output` to a file, or print it.
pub fn emit(output: &str, path: Option<&std::path::Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output)?;
            println!(
                "{} Output written to {}",
                console::style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", output.trim_end()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-02-28"),
            Ok(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap())
        );
        assert!(parse_date("2025-02-30").unwrap_err().contains("invalid date"));
        assert!(parse_date("02/28/2025").is_err());
    }
}
