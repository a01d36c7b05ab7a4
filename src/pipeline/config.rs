//! Pipeline configuration.
//!
//! Loaded from an optional TOML file, then overridden by CLI flags.
//! Every field has a default, so an empty file is a valid config.

use crate::anomaly::DetectorSettings;
use crate::unifier::JoinMode;
use crate::utils::config::{
    DEFAULT_ANOMALY_THRESHOLD, DEFAULT_LOW_ROAS_THRESHOLD, DEFAULT_SPIKE_SIGMA, DEFAULT_TOP_N,
    DEFAULT_WINDOW_SIZE, MAX_TOP_N, MIN_BASELINE_POINTS,
};
use crate::utils::error::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options recognised by a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Trailing points in each channel's spend baseline
    pub window_size: usize,

    /// Prior points needed before a verdict; defaults to `window_size`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_baseline_points: Option<usize>,

    /// z-score cutoff for spend anomalies
    pub anomaly_threshold: f64,

    pub join_mode: JoinMode,

    /// Campaigns below this ROAS are reported as low performers
    pub low_roas_threshold: f64,

    /// Spike rule: daily spend > mean + sigma x stddev
    pub spike_sigma: f64,

    /// Leaderboard length
    pub top_n: usize,

    /// Inclusive date filter applied right after loading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_baseline_points: None,
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
            join_mode: JoinMode::Inner,
            low_roas_threshold: DEFAULT_LOW_ROAS_THRESHOLD,
            spike_sigma: DEFAULT_SPIKE_SIGMA,
            top_n: DEFAULT_TOP_N,
            date_from: None,
            date_to: None,
        }
    }
}

impl PipelineConfig {
    /// Reject values the pipeline cannot work with
    ///
    /// # Errors
    /// * `ConfigError::Invalid` - with a message naming the field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size < MIN_BASELINE_POINTS {
            return Err(invalid(format!(
                "window_size must be at least {} (got {})",
                MIN_BASELINE_POINTS, self.window_size
            )));
        }

        if let Some(min) = self.min_baseline_points {
            if min < MIN_BASELINE_POINTS || min > self.window_size {
                return Err(invalid(format!(
                    "min_baseline_points must be between {} and window_size {} (got {})",
                    MIN_BASELINE_POINTS, self.window_size, min
                )));
            }
        }

        if !self.anomaly_threshold.is_finite() || self.anomaly_threshold <= 0.0 {
            return Err(invalid(format!(
                "anomaly_threshold must be a positive number (got {})",
                self.anomaly_threshold
            )));
        }

        if !self.spike_sigma.is_finite() || self.spike_sigma < 0.0 {
            return Err(invalid(format!(
                "spike_sigma must be zero or positive (got {})",
                self.spike_sigma
            )));
        }

        if !self.low_roas_threshold.is_finite() || self.low_roas_threshold < 0.0 {
            return Err(invalid(format!(
                "low_roas_threshold must be zero or positive (got {})",
                self.low_roas_threshold
            )));
        }

        if self.top_n == 0 || self.top_n > MAX_TOP_N {
            return Err(invalid(format!(
                "top_n must be between 1 and {} (got {})",
                MAX_TOP_N, self.top_n
            )));
        }

        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(invalid(format!("date_from {} is after date_to {}", from, to)));
            }
        }

        Ok(())
    }

    /// Detector parameters derived from this config
    pub fn detector_settings(&self) -> DetectorSettings {
        DetectorSettings {
            window_size: self.window_size,
            min_baseline_points: self.min_baseline_points.unwrap_or(self.window_size),
            threshold: self.anomaly_threshold,
        }
    }

    /// Whether a date passes the configured range filter
    pub fn includes(&self, date: NaiveDate) -> bool {
        self.date_from.map_or(true, |from| date >= from) && self.date_to.map_or(true, |to| date <= to)
    }
}

/// Load a config from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Toml` - If TOML is invalid or has unknown keys
///
/// # Example
/// ```ignore
/// let config = load_config("pipeline.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&contents)?;
    Ok(config)
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}
