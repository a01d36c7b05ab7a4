//! Share of business revenue that channels claim, per date.

use crate::unifier::UnifiedTable;
use crate::utils::warning::DataQualityWarning;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribution for one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAttribution {
    pub date: NaiveDate,

    /// Attributed revenue summed across channels
    pub attributed_revenue: f64,

    /// Business revenue booked on the date
    pub total_revenue: f64,

    /// Share clamped to [0, 1]
    pub share: f64,

    /// Unclamped share; absent when total revenue is not positive
    pub raw_share: Option<f64>,

    pub over_attributed: bool,
}

/// Compute the attribution share for every date with business revenue
///
/// **Public** - part of the metric engine
///
/// # Returns
/// One entry per date (ascending) and an over-attribution warning for
/// every date whose raw share exceeds 1
///
/// Outer-join rows without total revenue are skipped; business-only
/// dates report a share of 0.
pub fn attribution_shares(table: &UnifiedTable) -> (Vec<DailyAttribution>, Vec<DataQualityWarning>) {
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for record in &table.records {
        let Some(total_revenue) = record.total_revenue else {
            continue;
        };
        let entry = by_date.entry(record.date).or_insert((0.0, total_revenue));
        entry.0 += record.attributed_revenue;
    }

    for day in &table.business_only {
        by_date.entry(day.date).or_insert((0.0, day.total_revenue));
    }

    let mut shares = Vec::with_capacity(by_date.len());
    let mut warnings = Vec::new();

    for (date, (attributed_revenue, total_revenue)) in by_date {
        let entry = attribution_for_day(date, attributed_revenue, total_revenue);

        if entry.over_attributed {
            warn!(
                "Over-attribution on {}: {:.2} attributed vs {:.2} total revenue",
                date, attributed_revenue, total_revenue
            );
            warnings.push(DataQualityWarning::OverAttribution {
                date,
                attributed_revenue,
                total_revenue,
                raw_share: entry.raw_share,
            });
        }

        shares.push(entry);
    }

    debug!(
        "Computed attribution for {} dates ({} over-attributed)",
        shares.len(),
        warnings.len()
    );

    (shares, warnings)
}

/// Clamp a single day's share and decide whether it is over-attributed
///
/// **Public** - exposed for callers working with their own totals
pub fn attribution_for_day(date: NaiveDate, attributed_revenue: f64, total_revenue: f64) -> DailyAttribution {
    let (share, raw_share, over_attributed) = if total_revenue > 0.0 {
        let raw = attributed_revenue / total_revenue;
        (raw.clamp(0.0, 1.0), Some(raw), raw > 1.0)
    } else if attributed_revenue > 0.0 {
        // Revenue claimed on a day the business booked none
        (1.0, None, true)
    } else {
        (0.0, None, false)
    };

    DailyAttribution {
        date,
        attributed_revenue,
        total_revenue,
        share,
        raw_share,
        over_attributed,
    }
}
