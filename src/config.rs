//! Configuration module for clouddrive.

use serde::Deserialize;
use std::path::Path;

use crate::{DriveError, Result};

/// Which key-value store backend holds account bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map, lost on exit.
    #[default]
    Memory,
    /// JSON object persisted to a single file.
    File,
}

/// Key-value store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store backend.
    #[serde(default)]
    pub backend: StoreBackend,
    /// Path of the store file (file backend only).
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    "data/local_storage.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
        }
    }
}

/// Account configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Simulated network latency applied to account operations, in milliseconds.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Minimum password length accepted at registration and password change.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

fn default_latency_ms() -> u64 {
    1000
}

fn default_min_password_length() -> usize {
    6
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            min_password_length: default_min_password_length(),
        }
    }
}

/// Drive configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveConfig {
    /// Number of files shown in the recent view.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Storage quota shown to the user, in GiB.
    #[serde(default = "default_storage_quota_gb")]
    pub storage_quota_gb: f64,
    /// Timezone used for the short modified date (e.g., "Europe/Istanbul", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_recent_limit() -> usize {
    10
}

fn default_storage_quota_gb() -> f64 {
    15.0
}

fn default_timezone() -> String {
    "Europe/Istanbul".to_string()
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            storage_quota_gb: default_storage_quota_gb(),
            timezone: default_timezone(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file, appended to. Empty logs to the console only.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/clouddrive.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Key-value store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Account configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Drive configuration.
    #[serde(default)]
    pub drive: DriveConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DriveError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DriveError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides.
    ///
    /// - `CLOUDDRIVE_STORE_PATH`: switches to the file backend at the given path
    /// - `CLOUDDRIVE_LOG_LEVEL`: overrides `logging.level`
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("CLOUDDRIVE_STORE_PATH") {
            if !path.is_empty() {
                self.store.backend = StoreBackend::File;
                self.store.path = path;
            }
        }

        if let Ok(level) = std::env::var("CLOUDDRIVE_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Check values that serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.store.backend == StoreBackend::File && self.store.path.trim().is_empty() {
            return Err(DriveError::Config(
                "store.path is required for the file backend".to_string(),
            ));
        }

        if self.drive.recent_limit == 0 {
            return Err(DriveError::Config(
                "drive.recent_limit must be at least 1".to_string(),
            ));
        }

        if self.drive.storage_quota_gb <= 0.0 {
            return Err(DriveError::Config(
                "drive.storage_quota_gb must be positive".to_string(),
            ));
        }

        if self.drive.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(DriveError::Config(format!(
                "unknown drive.timezone: {}",
                self.drive.timezone
            )));
        }

        Ok(())
    }
}
