//! Campaign rankings.
//!
//! Both rankings are total orders: after the primary key they fall back
//! to channel and campaign id, so identical input always ranks the same.

use super::summary::CampaignSummary;
use crate::loader::Channel;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A ranked campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub channel: Channel,
    pub campaign_id: String,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub roas: f64,
}

/// Rank campaigns by ROAS
///
/// **Public** - descending ROAS, ties broken by descending spend
///
/// # Arguments
/// * `campaigns` - Campaign summaries from the metric engine
/// * `top_n` - Number of entries to keep
pub fn rank_by_roas(campaigns: &[CampaignSummary], top_n: usize) -> Vec<LeaderboardEntry> {
    rank(campaigns, top_n, compare_by_roas)
}

/// Rank campaigns by spend
///
/// **Public** - descending spend, ties broken by descending ROAS
pub fn rank_by_spend(campaigns: &[CampaignSummary], top_n: usize) -> Vec<LeaderboardEntry> {
    rank(campaigns, top_n, compare_by_spend)
}

/// ROAS desc, spend desc, channel asc, campaign asc
pub fn compare_by_roas(a: &CampaignSummary, b: &CampaignSummary) -> Ordering {
    b.performance
        .roas
        .total_cmp(&a.performance.roas)
        .then_with(|| b.performance.spend.total_cmp(&a.performance.spend))
        .then_with(|| compare_identity(a, b))
}

/// Spend desc, ROAS desc, channel asc, campaign asc
pub fn compare_by_spend(a: &CampaignSummary, b: &CampaignSummary) -> Ordering {
    b.performance
        .spend
        .total_cmp(&a.performance.spend)
        .then_with(|| b.performance.roas.total_cmp(&a.performance.roas))
        .then_with(|| compare_identity(a, b))
}

fn compare_identity(a: &CampaignSummary, b: &CampaignSummary) -> Ordering {
    a.channel
        .cmp(&b.channel)
        .then_with(|| a.campaign_id.cmp(&b.campaign_id))
}

fn rank(
    campaigns: &[CampaignSummary],
    top_n: usize,
    compare: fn(&CampaignSummary, &CampaignSummary) -> Ordering,
) -> Vec<LeaderboardEntry> {
    let mut sorted: Vec<&CampaignSummary> = campaigns.iter().collect();
    sorted.sort_by(|a, b| compare(a, b));

    sorted
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(index, campaign)| LeaderboardEntry {
            rank: index + 1,
            channel: campaign.channel,
            campaign_id: campaign.campaign_id.clone(),
            spend: campaign.performance.spend,
            attributed_revenue: campaign.performance.attributed_revenue,
            roas: campaign.performance.roas,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ratios::Performance;

    fn campaign(channel: Channel, id: &str, spend: f64, revenue: f64) -> CampaignSummary {
        let mut performance = Performance::default();
        performance.add(0, 0, spend, revenue);
        CampaignSummary {
            channel,
            campaign_id: id.to_string(),
            performance: performance.finish(),
        }
    }

    #[test]
    fn test_rank_by_roas_breaks_ties_on_spend() {
        let campaigns = vec![
            campaign(Channel::Facebook, "lucky", 10.0, 50.0),
            campaign(Channel::Google, "steady", 1000.0, 5000.0),
            campaign(Channel::TikTok, "best", 100.0, 800.0),
        ];

        let board = rank_by_roas(&campaigns, 10);

        let ids: Vec<&str> = board.iter().map(|e| e.campaign_id.as_str()).collect();
        assert_eq!(ids, vec!["best", "steady", "lucky"]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[2].rank, 3);
    }

    #[test]
    fn test_full_ties_fall_back_to_identity() {
        let campaigns = vec![
            campaign(Channel::TikTok, "a", 10.0, 10.0),
            campaign(Channel::Facebook, "b", 10.0, 10.0),
            campaign(Channel::Facebook, "a", 10.0, 10.0),
        ];

        let board = rank_by_roas(&campaigns, 10);
        let keys: Vec<(Channel, &str)> = board.iter().map(|e| (e.channel, e.campaign_id.as_str())).collect();

        assert_eq!(
            keys,
            vec![(Channel::Facebook, "a"), (Channel::Facebook, "b"), (Channel::TikTok, "a")]
        );
    }

    #[test]
    fn test_zero_spend_campaign_ranks_with_zero_roas() {
        let campaigns = vec![
            campaign(Channel::Google, "idle", 0.0, 0.0),
            campaign(Channel::Google, "weak", 100.0, 10.0),
        ];

        let board = rank_by_roas(&campaigns, 10);
        assert_eq!(board[0].campaign_id, "weak");
        assert_eq!(board[1].roas, 0.0);
    }

    #[test]
    fn test_rank_by_spend_truncates() {
        let campaigns = vec![
            campaign(Channel::Google, "small", 1.0, 10.0),
            campaign(Channel::Google, "big", 100.0, 10.0),
            campaign(Channel::Google, "mid", 50.0, 10.0),
        ];

        let board = rank_by_spend(&campaigns, 2);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].campaign_id, "big");
        assert_eq!(board[1].campaign_id, "mid");
    }
}
