//! Spend anomaly detection and dashboard alert rules.
//!
//! - `detector`: per-channel rolling baseline with a z-score cutoff
//! - `alerts`: low-ROAS campaigns and period-wide spend spikes
//! - `window`: the bounded queue both rely on

pub mod alerts;
pub mod detector;
pub mod window;

pub use alerts::{low_roas_campaigns, spend_spikes, SpendSpike};
pub use detector::{detect_series, detect_spend_anomalies, AnomalyFlag, AnomalyStatus, DetectorSettings};
pub use window::{Baseline, RollingWindow};
