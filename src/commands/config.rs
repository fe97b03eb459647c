use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::{API_KEY_VAR, Config, LogLevel};

/// `config` is the effective configuration (overrides applied); `set` only
/// ever persists the file contents found at `config_path` or the default chain.
pub fn run(action: ConfigAction, config: &Config, config_path: Option<&PathBuf>) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
        ConfigAction::Set { key, value } => set(&key, &value, config_path),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "Clearlist Configuration".bold());
            println!();

            println!("{}:", "paths".cyan());
            println!("  profiles: {}", config.profiles_dir().display());
            println!();

            println!("{}:", "generation".cyan());
            println!("  model: {}", config.generation.model);
            println!("  max_tokens: {}", config.generation.max_tokens);
            println!("  temperature: {}", config.generation.temperature);
            println!("  api_base: {}", config.generation.api_base);
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());

            let key_status = if Config::api_key().is_ok() {
                "found".green()
            } else {
                "missing".red()
            };
            println!("{}: {}", API_KEY_VAR.cyan(), key_status);
        }
    }

    Ok(())
}

fn lookup(key: &str, config: &Config) -> Option<String> {
    match key {
        "paths.profiles" => Some(config.paths.profiles.display().to_string()),
        "generation.model" => Some(config.generation.model.clone()),
        "generation.max_tokens" => Some(config.generation.max_tokens.to_string()),
        "generation.temperature" => Some(config.generation.temperature.to_string()),
        "generation.api_base" => Some(config.generation.api_base.clone()),
        "log_level" | "log-level" => Some(config.log_level.as_filter().to_string()),
        _ => None,
    }
}

fn get(key: &str, config: &Config) -> Result<()> {
    match lookup(key, config) {
        Some(v) => println!("{}", v),
        None => eyre::bail!("Unknown config key: {}", key),
    }

    Ok(())
}

fn apply(key: &str, value: &str, config: &mut Config) -> Result<()> {
    match key {
        "paths.profiles" => config.paths.profiles = value.into(),
        "generation.model" => config.generation.model = value.to_string(),
        "generation.max_tokens" => {
            config.generation.max_tokens = value.parse().context("Invalid max_tokens (use a positive integer)")?;
        }
        "generation.temperature" => {
            config.generation.temperature = value.parse().context("Invalid temperature (use a number like 0.7)")?;
        }
        "generation.api_base" => config.generation.api_base = value.to_string(),
        "log_level" | "log-level" => config.log_level = value.parse::<LogLevel>()?,
        _ => {
            eyre::bail!("Unknown config key: {}", key);
        }
    }

    Ok(())
}

fn set(key: &str, value: &str, config_path: Option<&PathBuf>) -> Result<()> {
    println!("{} Setting {} = {}", "→".blue(), key.cyan(), value.green());

    let mut new_config = Config::load_file(config_path)?;
    apply(key, value, &mut new_config)?;

    let config_path = config_path
        .cloned()
        .unwrap_or_else(|| Config::clearlist_dir().join("clearlist.yaml"));
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let yaml_str = serde_yaml::to_string(&new_config).context("Failed to serialize config")?;
    fs::write(&config_path, yaml_str).context("Failed to write config file")?;

    println!("  {} Saved to {}", "✓".green(), config_path.display());

    Ok(())
}
