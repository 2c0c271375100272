//! Configuration management for timekit
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    BLOCK_CHECK_INTERVAL_MS, CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_GENERATED, DATE_TIME_FORMAT,
    DEFAULT_TIMEOUT_MS, DRAIN_CHECK_INTERVAL_MS, UTC_MILLIS_FORMAT,
};
use anyhow::{Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
    pub logging: LoggingConfig,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Format for local date-time strings
    pub date_time_format: String,
    /// Format for UTC strings with milliseconds
    pub utc_format: String,
    /// Fixed offset east of UTC used as "local" time; unset means the machine zone
    pub local_offset_minutes: Option<i32>,
}

/// Timer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Re-check interval while blocked on a running signal
    pub block_check_interval_ms: u64,
    /// Re-check interval while draining running tasks
    pub drain_check_interval_ms: u64,
    /// Deadline used when a caller does not pick one
    pub default_timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging
    pub enabled: bool,
    /// Level filter: off, error, warn, info, debug, trace
    pub level: String,
    /// Also append log lines to this file
    pub file: Option<PathBuf>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_time_format: DATE_TIME_FORMAT.to_string(),
            utc_format: UTC_MILLIS_FORMAT.to_string(),
            local_offset_minutes: None,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            block_check_interval_ms: BLOCK_CHECK_INTERVAL_MS,
            drain_check_interval_ms: DRAIN_CHECK_INTERVAL_MS,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl DisplayConfig {
    /// The configured fixed zone, if any
    pub fn local_offset(&self) -> Option<FixedOffset> {
        self.local_offset_minutes
            .and_then(|minutes| minutes.checked_mul(60))
            .and_then(FixedOffset::east_opt)
    }
}

impl TimingConfig {
    pub fn block_check_interval(&self) -> Duration {
        Duration::from_millis(self.block_check_interval_ms)
    }

    pub fn drain_check_interval(&self) -> Duration {
        Duration::from_millis(self.drain_check_interval_ms)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join(CONFIG_DIR_NAME).join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for (name, format) in [
            ("date_time_format", &self.display.date_time_format),
            ("utc_format", &self.display.utc_format),
        ] {
            if crate::utils::datetime::format(&chrono::Utc::now(), &chrono::Utc, format).is_err() {
                anyhow::bail!("Invalid {} '{}'", name, format);
            }
        }

        if let Some(minutes) = self.display.local_offset_minutes {
            if self.display.local_offset().is_none() {
                anyhow::bail!("local_offset_minutes must be within +/-1439, got {}", minutes);
            }
        }

        if self.timing.block_check_interval_ms == 0 || self.timing.drain_check_interval_ms == 0 {
            anyhow::bail!("check intervals must be greater than 0 ms");
        }

        if self.timing.default_timeout_ms == 0 {
            anyhow::bail!("default_timeout_ms must be greater than 0");
        }

        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            anyhow::bail!("Invalid logging level '{}'", self.logging.level);
        }

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        let header = format!(
            "# timekit Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format(crate::constants::DATE_FORMAT)
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join(CONFIG_DIR_NAME))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
