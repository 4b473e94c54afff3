//! Configuration loading, validation, and management for Parley.
//!
//! Loads configuration from `~/.parley/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use parley_core::continuity::ContinuityPolicy;
use parley_core::domain::Domain;
use parley_core::log::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides the directory session logs are stored in.
pub const DATA_DIR_ENV: &str = "PARLEY_DATA_DIR";

/// Overrides `[history] window_days`.
pub const HISTORY_DAYS_ENV: &str = "PARLEY_HISTORY_DAYS";

/// The root configuration structure.
///
/// Maps directly to `~/.parley/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the session logs (defaults to `~/.parley/data`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Log file name per domain
    #[serde(default)]
    pub logs: LogsConfig,

    /// History query settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// Vocabulary used to reference the previous session
    #[serde(default)]
    pub continuity: ContinuityPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_order_log")]
    pub order: String,

    #[serde(default = "default_check_in_log")]
    pub check_in: String,

    #[serde(default = "default_lead_log")]
    pub lead: String,
}

fn default_order_log() -> String {
    "orders.json".into()
}
fn default_check_in_log() -> String {
    "wellness_log.json".into()
}
fn default_lead_log() -> String {
    "leads.json".into()
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            order: default_order_log(),
            check_in: default_check_in_log(),
            lead: default_lead_log(),
        }
    }
}

impl LogsConfig {
    pub fn file_name(&self, domain: Domain) -> &str {
        match domain {
            Domain::Order => &self.order,
            Domain::CheckIn => &self.check_in,
            Domain::Lead => &self.lead,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Look-back window for `get_previous_check_ins` and `parley history`
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.parley/config.toml).
    ///
    /// Environment overrides (highest priority):
    /// - `PARLEY_DATA_DIR`
    /// - `PARLEY_HISTORY_DAYS`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment-style overrides read through `lookup`.
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(days) = lookup(HISTORY_DAYS_ENV) {
            self.history.window_days = days.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "{HISTORY_DAYS_ENV} must be a whole number of days, got '{days}'"
                ))
            })?;
        }

        self.validate()
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".parley")
    }

    /// Directory the session logs live in.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("data"))
    }

    /// Storage location of a domain's session log.
    pub fn log_path(&self, domain: Domain) -> PathBuf {
        self.data_dir().join(self.logs.file_name(domain))
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_WINDOW_DAYS).contains(&self.history.window_days) {
            return Err(ConfigError::ValidationError(format!(
                "history.window_days must be between 1 and {MAX_WINDOW_DAYS}"
            )));
        }

        for domain in Domain::ALL {
            if self.logs.file_name(domain).trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "logs.{} must name a file",
                    log_key(domain)
                )));
            }
        }

        let ranges = [
            ("low_energy_range", self.continuity.low_energy_range),
            ("neutral_energy_range", self.continuity.neutral_energy_range),
            ("high_energy_range", self.continuity.high_energy_range),
        ];
        for (name, [low, high]) in ranges {
            if low > high {
                return Err(ConfigError::ValidationError(format!(
                    "continuity.{name} must be [low, high] with low <= high"
                )));
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            logs: LogsConfig::default(),
            history: HistoryConfig::default(),
            continuity: ContinuityPolicy::default(),
        }
    }
}

fn log_key(domain: Domain) -> &'static str {
    match domain {
        Domain::Order => "order",
        Domain::CheckIn => "check_in",
        Domain::Lead => "lead",
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
