//! Configuration Loader
//!
//! Loads and validates configuration from TOML files. Every section is
//! optional; missing sections take their defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::application::DEFAULT_MAX_FILES;
use crate::detection::{DetectionConfig, DEFAULT_SIGMA_MULTIPLIER, DEFAULT_WINDOW_LEN};

/// Environment variable overriding `[storage] output_dir`
pub const OUTPUT_DIR_ENV: &str = "OUTLIER_SCAN_OUTPUT_DIR";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionSection,
    pub storage: StorageSection,
    pub batch: BatchSection,
    pub logging: LoggingSection,
}

/// Outlier rule configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionSection {
    /// Consecutive samples per window
    pub window_len: usize,
    /// Threshold in standard deviations
    pub sigma_multiplier: f64,
}

impl Default for DetectionSection {
    fn default() -> Self {
        Self {
            window_len: DEFAULT_WINDOW_LEN,
            sigma_multiplier: DEFAULT_SIGMA_MULTIPLIER,
        }
    }
}

/// Artifact storage configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Directory artifacts are written to
    pub output_dir: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            output_dir: "uploads".to_string(),
        }
    }
}

impl StorageSection {
    /// Get output directory with environment variable override and `~` expansion.
    /// Checks OUTLIER_SCAN_OUTPUT_DIR first, falls back to config value.
    pub fn resolved_output_dir(&self) -> PathBuf {
        let raw = std::env::var(OUTPUT_DIR_ENV).unwrap_or_else(|_| self.output_dir.clone());
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    }
}

/// Batch limits section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    /// Maximum files accepted per invocation
    pub max_files: usize,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        DetectionConfig::from(self)
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if self.storage.output_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "output_dir cannot be empty".to_string(),
            ));
        }

        if self.batch.max_files == 0 {
            return Err(ConfigError::ValidationError(format!(
                "max_files must be > 0, got {}",
                self.batch.max_files
            )));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging level must be one of {:?}, got {:?}",
                LOG_LEVELS, self.logging.level
            )));
        }

        Ok(())
    }
}

impl From<&Config> for DetectionConfig {
    fn from(config: &Config) -> Self {
        DetectionConfig {
            window_len: config.detection.window_len,
            sigma_multiplier: config.detection.sigma_multiplier,
        }
    }
}
