//! Pipeline entry point: Loader -> Unifier -> Metric Engine -> Anomaly Detector.
//!
//! Each stage is a pure function of the previous stage's output, so a
//! run can be repeated at any time on the same input.

pub mod config;
pub mod report;

pub use config::{load_config, PipelineConfig};
pub use report::{Alerts, PipelineReport};

use crate::anomaly::{detect_spend_anomalies, low_roas_campaigns, spend_spikes};
use crate::loader::{load_sources, LoadedData, SourceTables};
use crate::metrics::{
    attribution_shares, campaign_summaries, channel_summaries, daily_summaries, overview,
    rank_by_roas, rank_by_spend, DailySummary,
};
use crate::unifier::unify;
use crate::utils::error::PipelineError;
use crate::utils::warning::PipelineWarning;
use log::{debug, info};

/// Run the whole pipeline on four raw tables
///
/// **Public** - main entry point for the presentation layer
///
/// # Arguments
/// * `sources` - Facebook, Google, TikTok and business tables
/// * `config` - Window size, thresholds, join mode, filters
///
/// # Returns
/// The full report, including non-fatal warnings
///
/// # Errors
/// * `PipelineError::Config` - invalid configuration (checked before loading)
/// * `PipelineError::Load` - missing columns or unparseable values
///
/// # Example
/// ```ignore
/// let sources = SourceTables::from_dir("data")?;
/// let report = run_pipeline(&sources, &PipelineConfig::default())?;
/// ```
pub fn run_pipeline(sources: &SourceTables, config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    config.validate()?;

    let loaded = load_sources(sources)?;
    analyze(loaded, config)
}

/// Run every stage after loading
///
/// **Public** - for callers that already hold parsed records
pub fn analyze(loaded: LoadedData, config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    config.validate()?;

    let LoadedData {
        mut channel_records,
        mut business_records,
        mut warnings,
    } = loaded;

    if config.date_from.is_some() || config.date_to.is_some() {
        channel_records.retain(|r| config.includes(r.date));
        business_records.retain(|r| config.includes(r.date));
        debug!(
            "Date filter kept {} channel rows and {} business days",
            channel_records.len(),
            business_records.len()
        );
    }

    // Unifier
    let table = unify(&channel_records, &business_records, config.join_mode);
    if let Some(warning) = table.warning.clone() {
        warnings.push(warning.into());
    }

    // Metric engine
    let daily = daily_summaries(&table);
    let channels = channel_summaries(&table);
    let channel_dates = table.dates();
    let campaigns = campaign_summaries(&channel_records, &channel_dates);
    let leaderboard = rank_by_roas(&campaigns, config.top_n);
    let top_spend = rank_by_spend(&campaigns, config.top_n);

    let (attribution, quality) = attribution_shares(&table);
    warnings.extend(quality.into_iter().map(PipelineWarning::from));

    let kpis = overview(&daily);

    // Anomaly detector
    let anomalies = detect_spend_anomalies(&table, &config.detector_settings());

    // Spike statistics only cover days with channel activity
    let spend_days: Vec<DailySummary> = daily
        .iter()
        .filter(|d| channel_dates.contains(&d.date))
        .cloned()
        .collect();
    let alerts = Alerts {
        low_roas_campaigns: low_roas_campaigns(&campaigns, config.low_roas_threshold),
        spend_spikes: spend_spikes(&spend_days, config.spike_sigma),
    };

    info!(
        "Pipeline finished: {} days, spend {:.2}, ROAS {:.2}, {} warnings",
        kpis.days,
        kpis.total_spend,
        kpis.overall_roas,
        warnings.len()
    );

    Ok(PipelineReport {
        config: config.clone(),
        overview: kpis,
        join: table.summary,
        unified: table.records,
        daily,
        channels,
        campaigns,
        leaderboard,
        top_spend,
        attribution,
        anomalies,
        alerts,
        warnings,
    })
}
