use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::generation::GenerationOptions;

/// Environment variable holding the API credential
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Main clearlist configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub generation: GenerationConfig,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    pub profiles: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Base URL of an OpenAI-compatible API
    pub api_base: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            _ => eyre::bail!("Unknown log level: {}", s),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            profiles: Config::clearlist_dir().join("profiles"),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let options = GenerationOptions::default();
        Self {
            model: options.model,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            api_base: "https://api.openai.com/v1".to_string(),
        }
    }
}

impl GenerationConfig {
    /// Apply OPENAI_MODEL / MAX_TOKENS / TEMPERATURE overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(model) = std::env::var("OPENAI_MODEL")
            && !model.trim().is_empty()
        {
            self.model = model.trim().to_string();
        }

        if let Ok(value) = std::env::var("MAX_TOKENS") {
            match value.trim().parse() {
                Ok(max_tokens) => self.max_tokens = max_tokens,
                Err(_) => log::warn!("Ignoring invalid MAX_TOKENS: {}", value),
            }
        }

        if let Ok(value) = std::env::var("TEMPERATURE") {
            match value.trim().parse() {
                Ok(temperature) => self.temperature = temperature,
                Err(_) => log::warn!("Ignoring invalid TEMPERATURE: {}", value),
            }
        }
    }

    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file(config_path)?;
        config.generation.apply_env_overrides();
        Ok(config)
    }

    /// Load the config file alone, without environment overrides
    pub fn load_file(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try CLEARLIST_DIR/clearlist.yaml
        if let Ok(dir) = std::env::var("CLEARLIST_DIR") {
            let path = PathBuf::from(dir).join("clearlist.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from CLEARLIST_DIR: {}", e);
                    }
                }
            }
        }

        // Try ~/.config/clearlist/clearlist.yaml
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("clearlist").join("clearlist.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./clearlist.yaml (for development)
        let local_config = PathBuf::from("clearlist.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Get the clearlist directory (config, profiles and .env live here)
    pub fn clearlist_dir() -> PathBuf {
        std::env::var("CLEARLIST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("clearlist"))
    }

    /// Profiles directory with `~` and env vars expanded
    pub fn profiles_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.profiles)
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    /// Resolve the API key: environment, then `<clearlist_dir>/.env`, then `./.env`
    pub fn api_key() -> Result<String> {
        if let Ok(key) = std::env::var(API_KEY_VAR)
            && !key.trim().is_empty()
        {
            return Ok(key.trim().to_string());
        }

        let candidates = [Self::clearlist_dir().join(".env"), PathBuf::from(".env")];
        for env_file in &candidates {
            if let Some(key) = read_env_file(env_file, API_KEY_VAR)? {
                return Ok(key);
            }
        }

        eyre::bail!(
            "Missing API key: {} not found in environment or {}",
            API_KEY_VAR,
            candidates[0].display()
        )
    }
}

/// Look up `var` in a dotenv-style file
fn read_env_file(path: &Path, var: &str) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=')
            && key.trim() == var
        {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                return Ok(Some(value.to_string()));
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.max_tokens, 1000);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.paths.profiles.ends_with("profiles"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("generation:\n  model: gpt-4o\nlog_level: debug\n").unwrap();
        assert_eq!(config.generation.model, "gpt-4o");
        assert_eq!(config.generation.max_tokens, 1000);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_expand_path_no_expansion() {
        let path = PathBuf::from("/usr/local/share/profiles");
        assert_eq!(Config::expand_path(&path), path);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(&PathBuf::from("~/profiles"));
        assert!(!expanded.to_string_lossy().contains('~'));
        assert!(expanded.to_string_lossy().contains("profiles"));
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_options_from_config() {
        let config = GenerationConfig {
            model: "local-model".to_string(),
            max_tokens: 50,
            temperature: 0.1,
            api_base: "http://localhost:1234/v1".to_string(),
        };
        let options = config.options();
        assert_eq!(options.model, "local-model");
        assert_eq!(options.max_tokens, 50);
    }

    #[test]
    fn test_read_env_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        fs::write(
            &path,
            "# comment\nOTHER=1\nexport CLEARLIST_TEST_KEY=\"sk-test\"\n",
        )
        .unwrap();

        assert_eq!(
            read_env_file(&path, "CLEARLIST_TEST_KEY").unwrap(),
            Some("sk-test".to_string())
        );
        assert_eq!(read_env_file(&path, "MISSING").unwrap(), None);
        assert_eq!(read_env_file(&temp.path().join("nope"), "X").unwrap(), None);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let yaml_str = serde_yaml::to_string(&config).expect("Failed to serialize");
        let parsed: Config = serde_yaml::from_str(&yaml_str).expect("Failed to deserialize");
        assert_eq!(parsed.generation.model, config.generation.model);
        assert_eq!(parsed.paths.profiles, config.paths.profiles);
    }
}
