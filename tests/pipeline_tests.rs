use chrono::NaiveDate;
use marketing_intel::anomaly::AnomalyStatus;
use marketing_intel::loader::{Channel, RawTable, SourceTables};
use marketing_intel::pipeline::{run_pipeline, PipelineConfig};
use marketing_intel::unifier::JoinMode;
use marketing_intel::utils::error::{LoadError, PipelineError};
use marketing_intel::utils::warning::{DataQualityWarning, PipelineWarning};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

const CHANNEL_HEADER: &str = "date,tactic,state,campaign,impression,clicks,spend,attributed revenue\n";
const BUSINESS_HEADER: &str = "date,# of orders,# of new orders,new customers,total revenue,gross profit,COGS\n";

fn sources(facebook: &str, google: &str, tiktok: &str, business: &str) -> SourceTables {
    SourceTables {
        facebook: RawTable::from_text("Facebook.csv", format!("{CHANNEL_HEADER}{facebook}")),
        google: RawTable::from_text("Google.csv", format!("{CHANNEL_HEADER}{google}")),
        tiktok: RawTable::from_text("TikTok.csv", format!("{CHANNEL_HEADER}{tiktok}")),
        business: RawTable::from_text("Business.csv", format!("{BUSINESS_HEADER}{business}")),
    }
}

fn sample_sources() -> SourceTables {
    sources(
        "2025-05-16,ASC,NY,Prospecting,1000,50,100,300\n\
         2025-05-16,ASC,CA,Retargeting,400,10,50,20\n\
         2025-05-17,ASC,NY,Prospecting,1200,60,120,360\n\
         2025-05-20,ASC,NY,Prospecting,900,40,80,160\n",
        "2025-05-16,Search,NY,Brand,300,30,60,240\n\
         2025-05-17,Search,NY,Brand,300,30,0,0\n",
        "2025-05-17,Video,TX,Awareness,5000,25,40,10\n",
        "2025-05-16,100,30,25,1000,400,600\n\
         2025-05-17,90,20,15,800,300,500\n",
    )
}

#[test]
fn test_single_record_scenario() {
    let sources = sources(
        "2025-05-16,ASC,NY,Prospecting,1000,50,100,300\n",
        "",
        "",
        "2025-05-16,10,5,5,1000,0,0\n",
    );

    let report = run_pipeline(&sources, &PipelineConfig::default()).unwrap();

    assert_eq!(report.unified.len(), 1);
    assert_eq!(report.channels[0].performance.roas, 3.0);
    assert_eq!(report.attribution.len(), 1);
    assert_eq!(report.attribution[0].share, 0.3);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_spike_scenario_through_pipeline() {
    let mut facebook = String::new();
    let mut business = String::new();
    for day in 1..=9 {
        let spend = if day == 9 { 500 } else { 100 };
        facebook.push_str(&format!("2025-06-0{day},ASC,NY,Always On,1000,10,{spend},200\n"));
        business.push_str(&format!("2025-06-0{day},10,5,5,1000,0,0\n"));
    }

    let config = PipelineConfig {
        anomaly_threshold: 2.0,
        ..Default::default()
    };
    let report = run_pipeline(&sources(&facebook, "", "", &business), &config).unwrap();

    let statuses: Vec<AnomalyStatus> = report.anomalies.iter().map(|f| f.status).collect();
    let mut expected = vec![AnomalyStatus::Undetermined; 7];
    expected.push(AnomalyStatus::Normal);
    expected.push(AnomalyStatus::Anomalous);
    assert_eq!(statuses, expected);

    let flagged: Vec<_> = report.anomalous().collect();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].channel, Channel::Facebook);
    assert_eq!(flagged[0].observed_spend, 500.0);
}

#[test]
fn test_inner_join_never_invents_dates() {
    let report = run_pipeline(&sample_sources(), &PipelineConfig::default()).unwrap();

    let business_dates: BTreeSet<NaiveDate> = ["2025-05-16", "2025-05-17"]
        .iter()
        .map(|d| d.parse().unwrap())
        .collect();
    assert!(!report.unified.is_empty());
    assert!(report.unified.iter().all(|r| business_dates.contains(&r.date)));
    assert!(report.unified.iter().all(|r| r.total_revenue.is_some()));

    // 2025-05-20 has channel spend but no business row
    assert_eq!(report.join.unmatched_dates, 1);
    assert_eq!(report.join.unmatched_rows, 1);
    assert!(matches!(
        report.warnings.first(),
        Some(PipelineWarning::Join(w)) if !w.kept && w.unmatched_dates == 1
    ));
}

#[test]
fn test_outer_join_keeps_unmatched_dates() {
    let config = PipelineConfig {
        join_mode: JoinMode::Outer,
        ..Default::default()
    };
    let report = run_pipeline(&sample_sources(), &config).unwrap();

    let orphan = report
        .unified
        .iter()
        .find(|r| r.total_revenue.is_none())
        .expect("unmatched row kept");
    assert_eq!(orphan.spend, 80.0);
    // Attribution only covers dates with business revenue
    assert_eq!(report.attribution.len(), 2);
    assert_eq!(report.overview.days, 3);
}

#[test]
fn test_outer_join_keeps_business_only_dates() {
    let sources = sources(
        "2025-05-16,ASC,NY,Prospecting,1000,50,100,300\n",
        "",
        "",
        "2025-05-16,10,5,5,1000,0,0\n\
         2025-05-17,10,5,5,5000,0,0\n",
    );
    let config = PipelineConfig {
        join_mode: JoinMode::Outer,
        ..Default::default()
    };

    let report = run_pipeline(&sources, &config).unwrap();

    assert_eq!(report.overview.days, 2);
    assert_eq!(report.overview.total_revenue, 6000.0);
    assert_eq!(report.overview.total_spend, 100.0);
    let dates: Vec<String> = report.daily.iter().map(|d| d.date.to_string()).collect();
    assert_eq!(dates, vec!["2025-05-16", "2025-05-17"]);
    assert_eq!(report.join.business_only_dates, 1);

    // No channel row on 05-17, so no spend verdict either
    assert_eq!(report.unified.len(), 1);
    assert_eq!(report.anomalies.len(), 1);
    assert_eq!(report.attribution[1].share, 0.0);

    let inner = run_pipeline(&sources, &PipelineConfig::default()).unwrap();
    assert_eq!(inner.overview.total_revenue, 1000.0);
}

#[test]
fn test_huge_counts_do_not_overflow() {
    let sources = sources(
        "2025-05-16,ASC,NY,Prospecting,1e19,50,100,300\n\
         2025-05-16,ASC,CA,Prospecting,1e19,50,100,300\n",
        "",
        "",
        "2025-05-16,10,5,5,1000,0,0\n",
    );

    let report = run_pipeline(&sources, &PipelineConfig::default()).unwrap();

    assert_eq!(report.unified[0].impressions, u64::MAX);
    assert_eq!(report.channels[0].performance.impressions, u64::MAX);
}

#[test]
fn test_header_only_business_table_aborts() {
    let mut sources = sample_sources();
    sources.business = RawTable::from_text("Business.csv", BUSINESS_HEADER);

    let err = run_pipeline(&sources, &PipelineConfig::default()).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Load(LoadError::DataFormat { ref file, ref detail })
            if file == "Business.csv" && detail.contains("no data rows")
    ));
}

#[test]
fn test_zero_spend_roas_is_zero() {
    let report = run_pipeline(&sample_sources(), &PipelineConfig::default()).unwrap();

    for daily in &report.daily {
        if daily.performance.spend == 0.0 {
            assert_eq!(daily.performance.roas, 0.0);
        }
    }
    for record in report.unified.iter().filter(|r| r.spend == 0.0) {
        assert_eq!(record.channel, Channel::Google);
    }
    assert!(report.campaigns.iter().all(|c| c.performance.roas.is_finite()));
}

#[test]
fn test_leaderboard_order() {
    let report = run_pipeline(&sample_sources(), &PipelineConfig::default()).unwrap();

    let ranked: Vec<(&str, f64)> = report
        .leaderboard
        .iter()
        .map(|e| (e.campaign_id.as_str(), e.roas))
        .collect();

    // Brand: 240 / 60; Prospecting: 660 / 220; Retargeting: 20 / 50; Awareness: 10 / 40
    assert_eq!(
        ranked,
        vec![("Brand", 4.0), ("Prospecting", 3.0), ("Retargeting", 0.4), ("Awareness", 0.25)]
    );
    assert_eq!(report.top_spend[0].campaign_id, "Prospecting");

    let low: Vec<&str> = report
        .alerts
        .low_roas_campaigns
        .iter()
        .map(|c| c.campaign_id.as_str())
        .collect();
    assert_eq!(low, vec!["Awareness", "Retargeting"]);
}

#[test]
fn test_pipeline_is_deterministic() {
    let first = run_pipeline(&sample_sources(), &PipelineConfig::default()).unwrap();
    let second = run_pipeline(&sample_sources(), &PipelineConfig::default()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_over_attribution_warning() {
    let sources = sources(
        "2025-05-16,ASC,NY,Prospecting,1000,50,100,900\n",
        "2025-05-16,Search,NY,Brand,300,30,60,400\n",
        "",
        "2025-05-16,10,5,5,1000,0,0\n",
    );

    let report = run_pipeline(&sources, &PipelineConfig::default()).unwrap();

    assert_eq!(report.attribution[0].share, 1.0);
    assert_eq!(report.attribution[0].raw_share, Some(1.3));
    assert!(report.warnings.iter().any(|w| matches!(
        w,
        PipelineWarning::DataQuality(DataQualityWarning::OverAttribution { .. })
    )));
}

#[test]
fn test_date_range_filter() {
    let config = PipelineConfig {
        date_from: NaiveDate::from_ymd_opt(2025, 5, 17),
        ..Default::default()
    };

    let report = run_pipeline(&sample_sources(), &config).unwrap();

    assert_eq!(report.overview.days, 1);
    assert!(report.unified.iter().all(|r| r.date.to_string() == "2025-05-17"));
    // The unmatched 2025-05-20 row is still reported
    assert_eq!(report.join.unmatched_dates, 1);
}

#[test]
fn test_missing_column_aborts() {
    let mut sources = sample_sources();
    sources.business = RawTable::from_text("Business.csv", "date,orders\n2025-05-16,3\n");

    let err = run_pipeline(&sources, &PipelineConfig::default()).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Load(LoadError::DataFormat { ref file, .. }) if file == "Business.csv"
    ));
}

#[test]
fn test_invalid_config_aborts_before_loading() {
    let mut sources = sample_sources();
    sources.facebook = RawTable::from_text("Facebook.csv", "garbage");
    let config = PipelineConfig {
        window_size: 0,
        ..Default::default()
    };

    let err = run_pipeline(&sources, &config).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}
