//! Derived marketing metrics.
//!
//! This module turns the unified table into:
//! - ROAS, CPC and CTR at every aggregation level
//! - Daily attribution share with over-attribution checks
//! - Campaign leaderboards

pub mod attribution;
pub mod leaderboard;
pub mod ratios;
pub mod summary;

// Re-export main types and functions
pub use attribution::{attribution_for_day, attribution_shares, DailyAttribution};
pub use leaderboard::{rank_by_roas, rank_by_spend, LeaderboardEntry};
pub use ratios::{cpc, ctr, roas, Performance};
pub use summary::{
    campaign_summaries, channel_summaries, daily_summaries, overview, CampaignSummary,
    ChannelSummary, DailySummary, OverviewKpis,
};
