use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoadRiskError;
use crate::ewma::decay_for_span;
use crate::logging::LogConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Risk engine windows and defaults
    pub engine: EngineConfig,

    /// Logging output
    pub logging: LogConfig,

    /// Where workout logs are read from
    pub source: SourceSettings,
}

/// Windows, spans and defaults used by the load pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of the trailing daily load window, today included (default: 35)
    pub window_days: usize,

    /// Acute EWMA span in days (default: 7)
    pub acute_days: usize,

    /// Chronic EWMA span in days (default: 28)
    pub chronic_days: usize,

    /// Minimum non-zero load days before a ratio is reported (default: 7)
    pub min_data_days: usize,

    /// Effort assumed for logs without an effort level (default: 5)
    pub default_effort: i32,

    /// Days shown in the raw load trend (default: 14)
    pub trend_days: usize,

    /// Days summed for weekly mileage (default: 7)
    pub weekly_days: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            window_days: 35,
            acute_days: 7,
            chronic_days: 28,
            min_data_days: 7,
            default_effort: 5,
            trend_days: 14,
            weekly_days: 7,
        }
    }
}

impl EngineConfig {
    /// Acute decay constant, 0.25 for the default 7-day span
    pub fn acute_decay(&self) -> f64 {
        decay_for_span(self.acute_days)
    }

    /// Chronic decay constant, 2/29 for the default 28-day span
    pub fn chronic_decay(&self) -> f64 {
        decay_for_span(self.chronic_days)
    }

    /// Check that windows are non-empty and nested inside each other
    pub fn validate(&self) -> crate::error::Result<()> {
        let invalid = |reason: String| Err(LoadRiskError::Configuration(reason));

        if self.window_days == 0 || self.acute_days == 0 || self.chronic_days == 0 {
            return invalid("window, acute and chronic spans must be at least 1 day".to_string());
        }
        if self.acute_days > self.chronic_days {
            return invalid(format!(
                "acute span ({}) exceeds chronic span ({})",
                self.acute_days, self.chronic_days
            ));
        }
        if self.chronic_days > self.window_days {
            return invalid(format!(
                "chronic span ({}) exceeds window ({})",
                self.chronic_days, self.window_days
            ));
        }
        if self.min_data_days > self.window_days {
            return invalid(format!(
                "minimum data days ({}) exceeds window ({})",
                self.min_data_days, self.window_days
            ));
        }
        if self.trend_days > self.window_days || self.weekly_days > self.window_days {
            return invalid(format!(
                "trend ({}) and weekly ({}) spans must fit in the window ({})",
                self.trend_days, self.weekly_days, self.window_days
            ));
        }
        if !(1..=10).contains(&self.default_effort) {
            return invalid(format!(
                "default effort must be within 1-10, got {}",
                self.default_effort
            ));
        }

        Ok(())
    }
}

/// Log source settings for the command line tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Log file used when `--logs` is not given
    pub logs_path: Option<PathBuf>,

    /// Personal (unscheduled) log file merged with the scheduled logs
    pub personal_logs_path: Option<PathBuf>,
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config.engine.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".loadrisk")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %err,
                    "Ignoring unreadable config file, using defaults"
                );
                Self::default()
            }
        }
    }
}
