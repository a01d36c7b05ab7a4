use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let document = read_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;
    let report = &document.report;

    if document.version != SCHEMA_VERSION {
        println!(
            "⚠ Schema version {} differs from current {}",
            document.version, SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", document.version);
    println!("  Generated: {}", document.generated_at);
    println!("  Days: {}", report.overview.days);
    println!("  Unified Rows: {}", report.unified.len());
    println!("  Campaigns: {}", report.campaigns.len());
    println!("  Anomalies: {}", report.anomalous().count());
    println!("  Warnings: {}", report.warnings.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Marketing Intel Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string       - ISO 8601 timestamp");
        println!("  report: object");
        println!("    config: object           - Effective pipeline configuration");
        println!("    overview: object         - Spend, revenue, ROAS for the period");
        println!("    join: object             - Matched/unmatched date counts");
        println!("    unified: array           - Joined (date, channel) rows");
        println!("    daily: array             - All channels per date");
        println!("    channels: array          - Per-channel totals and ratios");
        println!("    campaigns: array         - Per-campaign totals and ratios");
        println!("    leaderboard: array       - Campaigns by ROAS (ties: spend)");
        println!("    top_spend: array         - Campaigns by spend");
        println!("    attribution: array       - Daily attribution share");
        println!("    anomalies: array         - Per-point spend verdicts");
        println!("    alerts: object           - Low-ROAS campaigns, spend spikes");
        println!("    warnings: array          - Join and data-quality warnings");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Marketing Intel v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Joins ad-channel exports with business metrics and flags spend anomalies.");
}
