//! Everything a pipeline run hands to the presentation layer.
//!
//! The report is plain data: no timestamps, no formatting. Two runs on
//! identical input produce equal reports.

use super::config::PipelineConfig;
use crate::anomaly::{AnomalyFlag, SpendSpike};
use crate::metrics::{
    CampaignSummary, ChannelSummary, DailyAttribution, DailySummary, LeaderboardEntry, OverviewKpis,
};
use crate::unifier::{JoinSummary, UnifiedRecord};
use crate::utils::warning::PipelineWarning;
use serde::{Deserialize, Serialize};

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Effective configuration of the run
    pub config: PipelineConfig,

    pub overview: OverviewKpis,
    pub join: JoinSummary,

    /// Joined (date, channel) rows
    pub unified: Vec<UnifiedRecord>,

    pub daily: Vec<DailySummary>,
    pub channels: Vec<ChannelSummary>,
    pub campaigns: Vec<CampaignSummary>,

    /// Campaigns by ROAS (ties: higher spend first)
    pub leaderboard: Vec<LeaderboardEntry>,

    /// Campaigns by spend
    pub top_spend: Vec<LeaderboardEntry>,

    pub attribution: Vec<DailyAttribution>,
    pub anomalies: Vec<AnomalyFlag>,
    pub alerts: Alerts,

    /// Non-fatal issues, in the order they were found
    pub warnings: Vec<PipelineWarning>,
}

/// Rule-based alerts over the whole period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Alerts {
    pub low_roas_campaigns: Vec<CampaignSummary>,
    pub spend_spikes: Vec<SpendSpike>,
}

impl PipelineReport {
    /// Flags that were judged anomalous
    pub fn anomalous(&self) -> impl Iterator<Item = &AnomalyFlag> {
        self.anomalies.iter().filter(|f| f.is_anomaly)
    }
}
