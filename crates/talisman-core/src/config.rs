//! Talisman Configuration Management
//!
//! Handles configuration from environment variables and TOML config files
//! with sensible defaults for local use.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    /// Extraction pipeline configuration
    pub extraction: ExtractionConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(distance) = std::env::var("TALISMAN_MAX_PAIR_DISTANCE") {
            config.extraction.max_pair_distance =
                distance.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "TALISMAN_MAX_PAIR_DISTANCE".to_string(),
                    value: distance,
                })?;
        }
        if let Ok(confidence) = std::env::var("TALISMAN_MIN_CONFIDENCE") {
            config.extraction.min_confidence =
                confidence.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "TALISMAN_MIN_CONFIDENCE".to_string(),
                    value: confidence,
                })?;
        }
        if let Ok(level) = std::env::var("TALISMAN_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }
}

/// Extraction pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ExtractionConfig {
    /// Maximum distance in bytes between a subject and object mention
    /// for a relation to be considered
    pub max_pair_distance: usize,

    /// Confidence threshold for keeping extracted mentions
    pub min_confidence: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_pair_distance: 120,
            min_confidence: 0.5,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
