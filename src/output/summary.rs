//! Plain-text summary of a report for terminal output.

use crate::pipeline::PipelineReport;

/// Render KPIs, channels, leaderboard, anomalies and warnings as text
///
/// **Public** - printed by `analyze --summary`
///
/// # Arguments
/// * `report` - Finished pipeline report
/// * `max_lines` - Maximum rows per table section
pub fn generate_text_summary(report: &PipelineReport, max_lines: usize) -> String {
    let mut lines = Vec::new();
    let kpis = &report.overview;

    lines.push("  📊 OVERVIEW".to_string());
    match (kpis.start_date, kpis.end_date) {
        (Some(start), Some(end)) => lines.push(format!("  Period:            {} → {} ({} days)", start, end, kpis.days)),
        _ => lines.push("  Period:            no joined data".to_string()),
    }
    lines.push(format!("  Total Spend:       ${:.0}", kpis.total_spend));
    lines.push(format!("  Total Revenue:     ${:.0}", kpis.total_revenue));
    lines.push(format!("  Attributed:        ${:.0}", kpis.total_attributed_revenue));
    lines.push(format!("  Overall ROAS:      {:.2}", kpis.overall_roas));
    lines.push(format!("  Avg Daily ROAS:    {:.2}", kpis.average_daily_roas));

    lines.push(String::new());
    lines.push("  📡 CHANNELS".to_string());
    lines.push(format!(
        "  {:<10} {:>12} {:>12} {:>7} {:>7} {:>7}",
        "Channel", "Spend", "Attributed", "ROAS", "CPC", "CTR%"
    ));
    for channel in &report.channels {
        let p = &channel.performance;
        lines.push(format!(
            "  {:<10} {:>12.2} {:>12.2} {:>7.2} {:>7.2} {:>7.2}",
            channel.channel.as_str(),
            p.spend,
            p.attributed_revenue,
            p.roas,
            p.cpc,
            p.ctr * 100.0
        ));
    }

    lines.push(String::new());
    lines.push("  🏆 TOP CAMPAIGNS BY ROAS".to_string());
    for entry in report.leaderboard.iter().take(max_lines) {
        lines.push(format!(
            "  {:>3}. {:<10} {:<32} ROAS {:>6.2}  spend {:>10.2}",
            entry.rank,
            entry.channel.as_str(),
            truncate(&entry.campaign_id, 32),
            entry.roas,
            entry.spend
        ));
    }

    let anomalous: Vec<_> = report.anomalous().collect();
    lines.push(String::new());
    lines.push(format!("  ⚠️  SPEND ANOMALIES ({})", anomalous.len()));
    for flag in anomalous.iter().take(max_lines) {
        let z = flag
            .z_score
            .map(|z| format!("z={:+.2}", z))
            .unwrap_or_else(|| "flat baseline".to_string());
        lines.push(format!(
            "  {} {:<10} spend {:>10.2} vs mean {:>10.2} ({})",
            flag.date,
            flag.channel.as_str(),
            flag.observed_spend,
            flag.baseline_mean.unwrap_or_default(),
            z
        ));
    }

    if !report.alerts.low_roas_campaigns.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "  🚨 LOW ROAS CAMPAIGNS (< {})",
            report.config.low_roas_threshold
        ));
        for campaign in report.alerts.low_roas_campaigns.iter().take(max_lines) {
            lines.push(format!(
                "  {:<10} {:<32} ROAS {:>6.2}  spend {:>10.2}",
                campaign.channel.as_str(),
                truncate(&campaign.campaign_id, 32),
                campaign.performance.roas,
                campaign.performance.spend
            ));
        }
    }

    if !report.alerts.spend_spikes.is_empty() {
        lines.push(String::new());
        lines.push("  🚨 SPEND SPIKES".to_string());
        for spike in &report.alerts.spend_spikes {
            lines.push(format!(
                "  {} spend {:>10.2} (threshold {:.2})",
                spike.date, spike.spend, spike.spike_threshold
            ));
        }
    }

    if !report.warnings.is_empty() {
        lines.push(String::new());
        lines.push(format!("  WARNINGS ({})", report.warnings.len()));
        for warning in report.warnings.iter().take(max_lines) {
            lines.push(format!("  - {}", warning));
        }
    }

    lines.join("\n")
}

/// Shorten long campaign names for fixed-width columns
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
