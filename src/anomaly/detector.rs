//! Rolling-baseline spend anomaly detection per channel.
//!
//! Each channel is scanned in date order with its own window; nothing
//! is carried from one channel to the next. A point is compared with the
//! window as it stood *before* the point was added.

use super::window::{Baseline, RollingWindow};
use crate::loader::Channel;
use crate::unifier::{UnifiedRecord, UnifiedTable};
use crate::utils::config::{DEFAULT_ANOMALY_THRESHOLD, DEFAULT_WINDOW_SIZE, MIN_BASELINE_POINTS};
use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Relative tolerance below which a baseline counts as constant
const FLAT_TOLERANCE: f64 = 1e-9;

/// Detector parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorSettings {
    /// Number of trailing points kept per channel
    pub window_size: usize,

    /// Prior points needed before a verdict is given (at least 2)
    pub min_baseline_points: usize,

    /// Deviation cutoff in standard deviations
    pub threshold: f64,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_baseline_points: DEFAULT_WINDOW_SIZE,
            threshold: DEFAULT_ANOMALY_THRESHOLD,
        }
    }
}

/// Verdict for one point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyStatus {
    /// Not enough history to judge
    Undetermined,
    Normal,
    Anomalous,
}

/// Spend check result for one (date, channel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFlag {
    pub date: NaiveDate,
    pub channel: Channel,
    pub observed_spend: f64,
    pub baseline_mean: Option<f64>,
    pub baseline_stddev: Option<f64>,

    /// Absent when undetermined or when the baseline is constant
    pub z_score: Option<f64>,

    pub status: AnomalyStatus,
    pub is_anomaly: bool,
}

/// Check every channel's spend series
///
/// **Public** - anomaly stage entry point
///
/// # Returns
/// One flag per unified record, grouped by channel, dates ascending
pub fn detect_spend_anomalies(table: &UnifiedTable, settings: &DetectorSettings) -> Vec<AnomalyFlag> {
    let flags: Vec<AnomalyFlag> = Channel::ALL
        .iter()
        .flat_map(|channel| detect_series(&table.channel_series(*channel), settings))
        .collect();

    info!(
        "Anomaly scan: {} points, {} anomalous, {} undetermined",
        flags.len(),
        flags.iter().filter(|f| f.is_anomaly).count(),
        flags
            .iter()
            .filter(|f| f.status == AnomalyStatus::Undetermined)
            .count()
    );

    flags
}

/// Check a single channel's series
///
/// **Public** - `series` must be one channel in date order
pub fn detect_series(series: &[&UnifiedRecord], settings: &DetectorSettings) -> Vec<AnomalyFlag> {
    let required = settings.min_baseline_points.max(MIN_BASELINE_POINTS);
    let mut window = RollingWindow::new(settings.window_size);
    let mut flags = Vec::with_capacity(series.len());

    for record in series {
        let baseline = window.baseline().filter(|b| b.points >= required);
        let flag = evaluate(record, baseline, settings.threshold);

        if flag.is_anomaly {
            debug!(
                "{} spend {:.2} on {} deviates from baseline {:.2}",
                record.channel,
                record.spend,
                record.date,
                flag.baseline_mean.unwrap_or_default()
            );
        }

        flags.push(flag);
        window.push(record.spend);
    }

    flags
}

/// Judge one point against its baseline
///
/// **Private** - constant baselines flag any deviation
fn evaluate(record: &UnifiedRecord, baseline: Option<Baseline>, threshold: f64) -> AnomalyFlag {
    let Some(baseline) = baseline else {
        return AnomalyFlag {
            date: record.date,
            channel: record.channel,
            observed_spend: record.spend,
            baseline_mean: None,
            baseline_stddev: None,
            z_score: None,
            status: AnomalyStatus::Undetermined,
            is_anomaly: false,
        };
    };

    let deviation = (record.spend - baseline.mean).abs();
    let tolerance = FLAT_TOLERANCE * baseline.mean.abs().max(1.0);

    let (z_score, is_anomaly) = if baseline.stddev <= tolerance {
        (None, deviation > tolerance)
    } else {
        (
            Some((record.spend - baseline.mean) / baseline.stddev),
            deviation > threshold * baseline.stddev,
        )
    };

    AnomalyFlag {
        date: record.date,
        channel: record.channel,
        observed_spend: record.spend,
        baseline_mean: Some(baseline.mean),
        baseline_stddev: Some(baseline.stddev),
        z_score,
        status: if is_anomaly {
            AnomalyStatus::Anomalous
        } else {
            AnomalyStatus::Normal
        },
        is_anomaly,
    }
}
