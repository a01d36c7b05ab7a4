//! Aggregated performance at the overall, daily, channel and campaign level.

use super::ratios::{roas, Performance};
use crate::loader::{Channel, ChannelRecord};
use crate::unifier::UnifiedTable;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Headline KPIs for the analysed period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverviewKpis {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub days: usize,
    pub total_spend: f64,

    /// Business revenue, counted once per date
    pub total_revenue: f64,

    pub total_attributed_revenue: f64,
    pub overall_roas: f64,

    /// Mean of daily ROAS over days with spend
    pub average_daily_roas: f64,
}

/// All channels combined for one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,

    #[serde(flatten)]
    pub performance: Performance,

    pub total_revenue: Option<f64>,
}

/// One channel over the whole period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub channel: Channel,

    #[serde(flatten)]
    pub performance: Performance,

    /// Fraction of total spend that went to this channel
    pub spend_share: f64,
}

/// One campaign over the whole period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub channel: Channel,
    pub campaign_id: String,

    #[serde(flatten)]
    pub performance: Performance,
}

/// Sum all channels per date
///
/// **Public** - daily series for spend/revenue and ROAS over time
///
/// Business-only dates kept by an outer join appear with zero spend.
pub fn daily_summaries(table: &UnifiedTable) -> Vec<DailySummary> {
    let mut by_date: BTreeMap<NaiveDate, (Performance, Option<f64>)> = BTreeMap::new();

    for record in &table.records {
        let entry = by_date
            .entry(record.date)
            .or_insert((Performance::default(), record.total_revenue));
        entry
            .0
            .add(record.impressions, record.clicks, record.spend, record.attributed_revenue);
    }

    for day in &table.business_only {
        by_date
            .entry(day.date)
            .or_insert((Performance::default(), Some(day.total_revenue)));
    }

    by_date
        .into_iter()
        .map(|(date, (performance, total_revenue))| DailySummary {
            date,
            performance: performance.finish(),
            total_revenue,
        })
        .collect()
}

/// Sum each channel over the period
///
/// **Public** - channel breakdown; channels without rows are omitted
pub fn channel_summaries(table: &UnifiedTable) -> Vec<ChannelSummary> {
    let mut by_channel: BTreeMap<Channel, Performance> = BTreeMap::new();

    for record in &table.records {
        by_channel.entry(record.channel).or_default().add(
            record.impressions,
            record.clicks,
            record.spend,
            record.attributed_revenue,
        );
    }

    let total_spend: f64 = by_channel.values().map(|p| p.spend).sum();

    by_channel
        .into_iter()
        .map(|(channel, performance)| ChannelSummary {
            channel,
            spend_share: if total_spend == 0.0 {
                0.0
            } else {
                performance.spend / total_spend
            },
            performance: performance.finish(),
        })
        .collect()
}

/// Sum each (channel, campaign) over the retained dates
///
/// **Public** - feeds the leaderboards
///
/// # Arguments
/// * `records` - Loaded channel rows
/// * `retained_dates` - Dates that survived the join; other rows are ignored
pub fn campaign_summaries(
    records: &[ChannelRecord],
    retained_dates: &BTreeSet<NaiveDate>,
) -> Vec<CampaignSummary> {
    let mut by_campaign: BTreeMap<(Channel, &str), Performance> = BTreeMap::new();

    for record in records.iter().filter(|r| retained_dates.contains(&r.date)) {
        by_campaign
            .entry((record.channel, record.campaign_id.as_str()))
            .or_default()
            .add(record.impressions, record.clicks, record.spend, record.attributed_revenue);
    }

    debug!("Summarised {} campaigns", by_campaign.len());

    by_campaign
        .into_iter()
        .map(|((channel, campaign_id), performance)| CampaignSummary {
            channel,
            campaign_id: campaign_id.to_string(),
            performance: performance.finish(),
        })
        .collect()
}

/// Headline KPIs from the daily series
///
/// **Public** - overview tiles
pub fn overview(daily: &[DailySummary]) -> OverviewKpis {
    if daily.is_empty() {
        return OverviewKpis::default();
    }

    let total_spend: f64 = daily.iter().map(|d| d.performance.spend).sum();
    let total_attributed_revenue: f64 = daily.iter().map(|d| d.performance.attributed_revenue).sum();
    let total_revenue: f64 = daily.iter().filter_map(|d| d.total_revenue).sum();

    let spending_days: Vec<f64> = daily
        .iter()
        .filter(|d| d.performance.spend != 0.0)
        .map(|d| d.performance.roas)
        .collect();
    let average_daily_roas = if spending_days.is_empty() {
        0.0
    } else {
        spending_days.iter().sum::<f64>() / spending_days.len() as f64
    };

    OverviewKpis {
        start_date: daily.first().map(|d| d.date),
        end_date: daily.last().map(|d| d.date),
        days: daily.len(),
        total_spend,
        total_revenue,
        total_attributed_revenue,
        overall_roas: roas(total_attributed_revenue, total_spend),
        average_daily_roas,
    }
}
