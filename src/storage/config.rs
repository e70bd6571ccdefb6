//! Configuration handling for dayplan
//!
//! Configuration is read from the first file found among an explicit
//! `--config` path, `./dayplan.toml`, and the platform config directory
//! (`~/.config/dayplan/config.toml` on Linux). A missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::{Algorithm, SharingPolicy};

/// File name looked up in the working directory
pub const LOCAL_CONFIG: &str = "dayplan.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Defaults for search commands
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// Sharing policy when `--sharing` is not given
    pub sharing: SharingPolicy,

    /// Strategy when `--algorithm` is not given
    pub algorithm: Algorithm,

    /// Day horizon for earliest-day queries (defaults to the task count)
    pub max_day: Option<u32>,

    /// Stop enumerating after this many schedules
    pub max_schedules: Option<usize>,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Combined configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub output: OutputConfig,

    /// File the configuration came from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from `explicit`, or from the default locations
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG);
        if local.exists() {
            return Self::load_file(&local);
        }

        match Self::global_config_path() {
            Some(path) if path.exists() => Self::load_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "dayplan", "dayplan").map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Loads and validates one configuration file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        config.source = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parses configuration text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.search.max_day == Some(0) {
            return Err(ConfigError::Invalid("search.max_day must be positive".to_string()));
        }
        if self.search.max_schedules == Some(0) {
            return Err(ConfigError::Invalid(
                "search.max_schedules must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.search.sharing, SharingPolicy::Instant);
        assert_eq!(config.search.algorithm, Algorithm::Astar);
        assert_eq!(config.search.max_day, None);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[search]
sharing = "delayed"
algorithm = "dfbb"
max_day = 12
max_schedules = 100

[output]
format = "json"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.search.sharing, SharingPolicy::Delayed);
        assert_eq!(config.search.algorithm, Algorithm::Dfbb);
        assert_eq!(config.search.max_day, Some(12));
        assert_eq!(config.search.max_schedules, Some(100));
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::parse("[search]\nalgorithm = \"bfs\"\n").unwrap();
        assert_eq!(config.search.algorithm, Algorithm::Bfs);
        assert_eq!(config.search.sharing, SharingPolicy::Instant);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::parse("[search]\nalgorithm = \"greedy\"\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::parse("[search]\nmax_day = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn explicit_path_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[output]\nformat = \"json\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
