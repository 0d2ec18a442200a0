//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use mileage_core::models::config::MileageConfig;

use super::Context;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "upload.max_file_size")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value (JSON, or a bare string)
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, ctx: &Context) -> anyhow::Result<()> {
    let config_path = ctx.config_file();

    match args.command {
        ConfigCommand::Show => show_config(&config_path),
        ConfigCommand::Init(init_args) => init_config(init_args, &config_path),
        ConfigCommand::Get { key } => get_config(&config_path, &key),
        ConfigCommand::Set { key, value } => set_config(&config_path, &key, &value),
        ConfigCommand::Path => show_path(&config_path),
    }
}

/// Per-user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mileage")
        .join("config.json")
}

fn read_or_default(path: &Path) -> anyhow::Result<MileageConfig> {
    if path.exists() {
        Ok(MileageConfig::from_file(path)?)
    } else {
        Ok(MileageConfig::default())
    }
}

fn show_config(config_path: &Path) -> anyhow::Result<()> {
    if !config_path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = read_or_default(config_path)?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, config_path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| config_path.to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    MileageConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(config_path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(read_or_default(config_path)?)?;
    let value = lookup(&json, key)?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(config_path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = read_or_default(config_path)?;

    // Accept JSON literals, fall back to a plain string
    let parsed_value: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let mut json = serde_json::to_value(&config)?;
    assign(&mut json, key, parsed_value.clone())?;

    // Round-trip through the typed config so bad values are rejected
    let config: MileageConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    config.save(config_path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

fn show_path(config_path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'mileage config init' to create a configuration file.");
    }

    Ok(())
}

/// Follow a dotted key through nested objects.
fn lookup<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.').try_fold(json, |current, part| {
        current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })
}

/// Set the value at a dotted key. Intermediate objects must exist; the last
/// segment may be new (e.g. an unset `store.data_file`).
fn assign(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (parent_key, last) = match key.rsplit_once('.') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, key),
    };

    let mut current = json;
    if let Some(parent_key) = parent_key {
        for part in parent_key.split('.') {
            current = current
                .get_mut(part)
                .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
        }
    }

    match current.as_object_mut() {
        Some(obj) => {
            obj.insert(last.to_string(), value);
            Ok(())
        }
        None => anyhow::bail!("Cannot set value at non-object path"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_key() {
        let json = serde_json::to_value(MileageConfig::default()).unwrap();
        assert_eq!(lookup(&json, "upload.max_file_size").unwrap(), &json!(10_485_760));
        assert!(lookup(&json, "upload.nope").is_err());
    }

    #[test]
    fn test_assign_creates_leaf() {
        let mut json = serde_json::to_value(MileageConfig::default()).unwrap();
        assign(&mut json, "store.data_file", json!("/tmp/trips.json")).unwrap();
        assign(&mut json, "gaps.skip_known_dates", json!(true)).unwrap();

        let config: MileageConfig = serde_json::from_value(json).unwrap();
        assert_eq!(
            config.store.data_file.as_deref(),
            Some(Path::new("/tmp/trips.json"))
        );
        assert!(config.gaps.skip_known_dates);
    }

    #[test]
    fn test_assign_rejects_missing_parent() {
        let mut json = serde_json::to_value(MileageConfig::default()).unwrap();
        assert!(assign(&mut json, "reports.threshold", json!(1)).is_err());
    }
}
