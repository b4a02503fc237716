//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::calculate::{MaidenOverBonus, PointsCalculator};
use crate::models::PointsRule;
use crate::parse_duration;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origin, or "*" for any
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Which storage backend to serve from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Jsonl,
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Leaderboard presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// How far back "weekly" points reach, e.g. "7d"
    #[serde(default = "default_weekly_window")]
    pub weekly_window: String,
}

fn default_page_size() -> u32 {
    50
}

fn default_max_page_size() -> u32 {
    100
}

fn default_weekly_window() -> String {
    "7d".to_string()
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            weekly_window: default_weekly_window(),
        }
    }
}

impl LeaderboardConfig {
    /// The weekly window as a chrono duration.
    pub fn window(&self) -> Option<chrono::Duration> {
        parse_duration(&self.weekly_window).and_then(|d| chrono::Duration::from_std(d).ok())
    }
}

/// Optional scoring extensions, all off by default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtensionsConfig {
    /// Score `maidenOver` for performances that carry a maiden count
    #[serde(default)]
    pub maiden_over_bonus: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root data directory
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub leaderboard: LeaderboardConfig,

    #[serde(default)]
    pub extensions: ExtensionsConfig,

    /// Rule set for leagues without a points system
    #[serde(default = "PointsRule::standard")]
    pub scoring: PointsRule,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            storage: StorageSettings::default(),
            leaderboard: LeaderboardConfig::default(),
            extensions: ExtensionsConfig::default(),
            scoring: PointsRule::standard(),
        }
    }
}

impl AppConfig {
    /// Calculator with the configured extensions registered.
    pub fn calculator(&self) -> PointsCalculator {
        let mut calculator = PointsCalculator::new();
        if self.extensions.maiden_over_bonus {
            calculator = calculator.with_extension(MaidenOverBonus);
        }
        calculator
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        let board = &self.leaderboard;
        if board.default_page_size == 0 || board.max_page_size == 0 {
            return Err(ConfigError::ValidationError(
                "Page sizes must be greater than 0".to_string(),
            ));
        }
        if board.default_page_size > board.max_page_size {
            return Err(ConfigError::ValidationError(format!(
                "default_page_size ({}) exceeds max_page_size ({})",
                board.default_page_size, board.max_page_size
            )));
        }
        if board.window().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "Unparsable weekly_window '{}'",
                board.weekly_window
            )));
        }

        Ok(())
    }
}
