//! Period-wide alert rules: weak campaigns and daily spend spikes.

use crate::metrics::{CampaignSummary, DailySummary};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

/// A day whose combined spend is far above the period's norm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendSpike {
    pub date: NaiveDate,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub roas: f64,

    /// Spend level above which a day counts as a spike
    pub spike_threshold: f64,
}

/// Campaigns whose ROAS is below `threshold`
///
/// **Public** - weakest first, ties broken by descending spend
///
/// Campaigns without spend have no meaningful ROAS and are never listed.
pub fn low_roas_campaigns(campaigns: &[CampaignSummary], threshold: f64) -> Vec<CampaignSummary> {
    let mut low: Vec<CampaignSummary> = campaigns
        .iter()
        .filter(|c| c.performance.spend > 0.0 && c.performance.roas < threshold)
        .cloned()
        .collect();

    low.sort_by(|a, b| {
        a.performance
            .roas
            .total_cmp(&b.performance.roas)
            .then_with(|| b.performance.spend.total_cmp(&a.performance.spend))
            .then_with(|| a.channel.cmp(&b.channel))
            .then_with(|| a.campaign_id.cmp(&b.campaign_id))
    });

    debug!("{} campaigns below ROAS {}", low.len(), threshold);

    low
}

/// Days whose total spend exceeds mean + `sigma` x stddev of the period
///
/// **Public** - needs at least two days; uses the sample stddev
pub fn spend_spikes(daily: &[DailySummary], sigma: f64) -> Vec<SpendSpike> {
    let n = daily.len();
    if n < 2 {
        return Vec::new();
    }

    let mean = daily.iter().map(|d| d.performance.spend).sum::<f64>() / n as f64;
    let variance = daily
        .iter()
        .map(|d| (d.performance.spend - mean).powi(2))
        .sum::<f64>()
        / (n - 1) as f64;
    let spike_threshold = mean + sigma * variance.sqrt();

    daily
        .iter()
        .filter(|d| d.performance.spend > spike_threshold)
        .map(|d| SpendSpike {
            date: d.date,
            spend: d.performance.spend,
            attributed_revenue: d.performance.attributed_revenue,
            roas: d.performance.roas,
            spike_threshold,
        })
        .collect()
}
