//! Settings Module
//! Dashboard configuration from an optional file plus environment overrides.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::stats::{SummaryOptions, DEFAULT_HISTOGRAM_BINS, DEFAULT_ROLLING_WINDOW};

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Underlying config crate error
    #[error("Configuration error: {0}")]
    ConfigCrateError(#[from] config::ConfigError),
}

/// Dashboard settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Daily rental CSV, relative to the working directory
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Buckets in the distribution histogram
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    /// Trailing window of the trend chart, in days
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,
    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            histogram_bins: default_histogram_bins(),
            rolling_window: default_rolling_window(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from `dashboard.{toml,json,...}` in the working
    /// directory and `BIKE_DASHBOARD_*` environment variables.
    ///
    /// Later sources override earlier ones; every key has a default.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("dashboard")
    }

    /// Same as [`Settings::load`] with an explicit config file stem.
    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(file_stem).required(false))
            .add_source(Environment::with_prefix("BIKE_DASHBOARD").try_parsing(true))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.histogram_bins == 0 {
            return Err(ConfigError::InvalidValue {
                key: "histogram_bins".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.rolling_window == 0 {
            return Err(ConfigError::InvalidValue {
                key: "rolling_window".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            histogram_bins: self.histogram_bins,
            rolling_window: self.rolling_window,
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("dashboard/main_data.csv")
}

fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}

fn default_rolling_window() -> usize {
    DEFAULT_ROLLING_WINDOW
}

fn default_log_filter() -> String {
    "bike_dashboard=info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.data_path, PathBuf::from("dashboard/main_data.csv"));
        assert_eq!(settings.histogram_bins, 20);
        assert_eq!(settings.rolling_window, 7);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.summary_options(), SummaryOptions::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .prefix("dashboard-")
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "data_path = \"data/day.csv\"\nhistogram_bins = 30").unwrap();
        let stem = file.path().with_extension("");

        let settings = Settings::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(settings.data_path, PathBuf::from("data/day.csv"));
        assert_eq!(settings.histogram_bins, 30);
        assert_eq!(settings.rolling_window, 7);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load_from("definitely/not/here/dashboard").unwrap();
        assert_eq!(settings.histogram_bins, DEFAULT_HISTOGRAM_BINS);
    }

    #[test]
    fn test_zero_window_rejected() {
        let settings = Settings {
            rolling_window: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
