//! Aggregate channel rows per (date, channel) and align them with the
//! business table on date.

use crate::loader::{BusinessRecord, Channel, ChannelRecord};
use crate::utils::warning::JoinWarning;
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Number of unmatched dates quoted in a join warning
const SAMPLE_DATE_LIMIT: usize = 5;

/// How channel dates without a business record are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinMode {
    /// Drop unmatched channel dates and business-only dates
    #[default]
    Inner,
    /// Keep both: channel dates without total revenue, business dates
    /// without spend
    Outer,
}

impl std::str::FromStr for JoinMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inner" => Ok(Self::Inner),
            "outer" | "full" => Ok(Self::Outer),
            other => Err(format!("unknown join mode '{}' (expected inner or outer)", other)),
        }
    }
}

/// Channel totals for one (date, channel) joined with the business revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedRecord {
    pub date: NaiveDate,
    pub channel: Channel,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub attributed_revenue: f64,

    /// Business revenue for the date; `None` only for outer-join leftovers
    pub total_revenue: Option<f64>,
}

/// Counts describing how the join went
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JoinSummary {
    pub mode: JoinMode,
    pub matched_dates: usize,
    pub unmatched_dates: usize,
    pub unmatched_rows: usize,

    /// Business dates with no channel rows (kept only by the outer join)
    pub business_only_dates: usize,

    pub unified_rows: usize,
}

/// Business revenue for a date on which no channel spent anything
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BusinessDay {
    pub date: NaiveDate,
    pub total_revenue: f64,
}

/// Output of the unifier stage, sorted by (date, channel)
#[derive(Debug, Clone, Default)]
pub struct UnifiedTable {
    pub records: Vec<UnifiedRecord>,
    pub summary: JoinSummary,
    pub warning: Option<JoinWarning>,

    /// Outer join only: business dates without any channel record
    pub business_only: Vec<BusinessDay>,
}

impl UnifiedTable {
    /// Distinct dates that carry channel records
    pub fn dates(&self) -> BTreeSet<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    /// Records of one channel, in date order
    pub fn channel_series(&self, channel: Channel) -> Vec<&UnifiedRecord> {
        self.records.iter().filter(|r| r.channel == channel).collect()
    }
}

#[derive(Debug, Default)]
struct ChannelDay {
    spend: f64,
    impressions: u64,
    clicks: u64,
    attributed_revenue: f64,
    rows: usize,
}

/// Join channel rows with business rows
///
/// **Public** - unifier stage entry point
///
/// # Arguments
/// * `channel_records` - All loaded channel rows
/// * `business_records` - Business rows (the first row wins for a repeated date)
/// * `mode` - Inner drops unmatched dates on either side, outer keeps them
///
/// # Returns
/// Unified table plus a join warning when any channel date had no match
pub fn unify(
    channel_records: &[ChannelRecord],
    business_records: &[BusinessRecord],
    mode: JoinMode,
) -> UnifiedTable {
    debug!(
        "Unifying {} channel rows against {} business rows ({:?} join)",
        channel_records.len(),
        business_records.len(),
        mode
    );

    let mut revenue_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in business_records {
        revenue_by_date.entry(record.date).or_insert(record.total_revenue);
    }

    let days = aggregate_channel_days(channel_records);
    let channel_dates: BTreeSet<NaiveDate> = days.keys().map(|(date, _)| *date).collect();

    let business_only: Vec<BusinessDay> = revenue_by_date
        .iter()
        .filter(|(date, _)| !channel_dates.contains(date))
        .map(|(date, total_revenue)| BusinessDay {
            date: *date,
            total_revenue: *total_revenue,
        })
        .collect();
    let business_only_dates = business_only.len();
    if business_only_dates > 0 {
        debug!("{} business date(s) have no channel rows", business_only_dates);
    }

    let mut records = Vec::with_capacity(days.len());
    let mut matched = BTreeSet::new();
    let mut unmatched = BTreeSet::new();
    let mut unmatched_rows = 0;

    for ((date, channel), day) in days {
        let total_revenue = revenue_by_date.get(&date).copied();

        if total_revenue.is_some() {
            matched.insert(date);
        } else {
            unmatched.insert(date);
            unmatched_rows += day.rows;
            if mode == JoinMode::Inner {
                continue;
            }
        }

        records.push(UnifiedRecord {
            date,
            channel,
            spend: day.spend,
            impressions: day.impressions,
            clicks: day.clicks,
            attributed_revenue: day.attributed_revenue,
            total_revenue,
        });
    }

    let warning = (!unmatched.is_empty()).then(|| JoinWarning {
        unmatched_dates: unmatched.len(),
        unmatched_rows,
        kept: mode == JoinMode::Outer,
        sample_dates: unmatched.iter().take(SAMPLE_DATE_LIMIT).copied().collect(),
    });

    if let Some(w) = &warning {
        warn!(
            "{} channel date(s) ({} rows) have no business record",
            w.unmatched_dates, w.unmatched_rows
        );
    }

    let summary = JoinSummary {
        mode,
        matched_dates: matched.len(),
        unmatched_dates: unmatched.len(),
        unmatched_rows,
        business_only_dates,
        unified_rows: records.len(),
    };

    info!(
        "Unified {} (date, channel) rows over {} matched dates",
        summary.unified_rows, summary.matched_dates
    );

    UnifiedTable {
        records,
        summary,
        warning,
        business_only: match mode {
            JoinMode::Outer => business_only,
            JoinMode::Inner => Vec::new(),
        },
    }
}

/// Sum channel rows per (date, channel)
///
/// **Private** - ordered map keeps the output sorted
fn aggregate_channel_days(records: &[ChannelRecord]) -> BTreeMap<(NaiveDate, Channel), ChannelDay> {
    let mut days: BTreeMap<(NaiveDate, Channel), ChannelDay> = BTreeMap::new();

    for record in records {
        let day = days.entry((record.date, record.channel)).or_default();
        day.spend += record.spend;
        day.impressions = day.impressions.saturating_add(record.impressions);
        day.clicks = day.clicks.saturating_add(record.clicks);
        day.attributed_revenue += record.attributed_revenue;
        day.rows += 1;
    }

    days
}
