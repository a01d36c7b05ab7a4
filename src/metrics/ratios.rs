//! Guarded ratio metrics and the totals they are computed from.
//!
//! A zero denominator yields 0 instead of NaN or an error, so a
//! campaign with no spend simply has ROAS 0.

use serde::{Deserialize, Serialize};

/// Return on ad spend: attributed revenue / spend
pub fn roas(attributed_revenue: f64, spend: f64) -> f64 {
    safe_ratio(attributed_revenue, spend)
}

/// Cost per click: spend / clicks
pub fn cpc(spend: f64, clicks: u64) -> f64 {
    safe_ratio(spend, clicks as f64)
}

/// Click-through rate: clicks / impressions
pub fn ctr(clicks: u64, impressions: u64) -> f64 {
    safe_ratio(clicks as f64, impressions as f64)
}

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Summed delivery figures with their derived ratios
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Performance {
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub roas: f64,
    pub cpc: f64,
    pub ctr: f64,
}

impl Performance {
    /// Add one row's figures (ratios are refreshed by `finish`)
    ///
    /// Counts saturate at `u64::MAX`.
    pub fn add(&mut self, impressions: u64, clicks: u64, spend: f64, attributed_revenue: f64) {
        self.impressions = self.impressions.saturating_add(impressions);
        self.clicks = self.clicks.saturating_add(clicks);
        self.spend += spend;
        self.attributed_revenue += attributed_revenue;
    }

    /// Recompute ratios from the accumulated totals
    pub fn finish(mut self) -> Self {
        self.roas = roas(self.attributed_revenue, self.spend);
        self.cpc = cpc(self.spend, self.clicks);
        self.ctr = ctr(self.clicks, self.impressions);
        self
    }
}
