//! Analysis configuration.
//!
//! Loaded from TOML; every field has a default so a partial (or missing)
//! file is valid.

use crate::metrics::rolling::DEFAULT_ROLLING_WINDOW_SECS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Functional Threshold Power in watts
    pub ftp: f64,
    /// Rolling window for Normalized Power, in seconds
    pub rolling_window_secs: u32,
    /// Durations for the mean maximal power curve
    pub power_curve_durations: Vec<u32>,
    /// Durations for the peak Normalized Power curve
    pub normalized_power_durations: Vec<u32>,
    /// Durations for heart-rate stability
    pub heart_rate_durations: Vec<u32>,
    /// Efficiency Factor settings
    pub efficiency: EfficiencySettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ftp: 225.0,
            rolling_window_secs: DEFAULT_ROLLING_WINDOW_SECS,
            power_curve_durations: vec![1, 5, 10, 30, 60, 120, 240, 300, 600, 900],
            normalized_power_durations: vec![300, 600, 1200, 1800, 3600],
            heart_rate_durations: vec![600, 1200, 2400, 3600],
            efficiency: EfficiencySettings::default(),
        }
    }
}

/// Efficiency Factor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencySettings {
    /// Durations to evaluate
    pub durations: Vec<u32>,
    /// Heart-rate standard deviation a window must stay below (bpm)
    pub min_heart_rate_std_dev: f64,
    /// Keep the heart-rate trace of each winning window
    pub capture_traces: bool,
}

impl Default for EfficiencySettings {
    fn default() -> Self {
        Self {
            durations: vec![600, 1200, 2400, 3600],
            min_heart_rate_std_dev: 3.0,
            capture_traces: false,
        }
    }
}

impl AnalysisConfig {
    /// Check every value before engines are built from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ftp.is_finite() && self.ftp > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "ftp must be positive, got {}",
                self.ftp
            )));
        }
        if self.rolling_window_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "rolling_window_secs must be at least 1".to_string(),
            ));
        }

        let lists = [
            ("power_curve_durations", &self.power_curve_durations),
            ("normalized_power_durations", &self.normalized_power_durations),
            ("heart_rate_durations", &self.heart_rate_durations),
            ("efficiency.durations", &self.efficiency.durations),
        ];
        for (name, durations) in lists {
            if durations.is_empty() {
                return Err(ConfigError::InvalidValue(format!("{} is empty", name)));
            }
            if durations.contains(&0) {
                return Err(ConfigError::InvalidValue(format!(
                    "{} contains a zero duration",
                    name
                )));
            }
        }

        let threshold = self.efficiency.min_heart_rate_std_dev;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "efficiency.min_heart_rate_std_dev must be positive, got {}",
                threshold
            )));
        }

        Ok(())
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "ridestats", "RideStats")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the default configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load configuration from the default location, or defaults if absent.
pub fn load_config() -> Result<AnalysisConfig, ConfigError> {
    let path = get_config_path();
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AnalysisConfig::default());
    }
    load_config_from(&path)
}

/// Load and validate configuration from a specific file.
pub fn load_config_from(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    let config = parse_config(&content)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AnalysisConfig, ConfigError> {
    let config: AnalysisConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to a file, creating parent directories.
pub fn save_config(config: &AnalysisConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
