//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Resolves the configuration (file + CLI overrides)
//! 2. Reads the four source tables
//! 3. Runs the pipeline
//! 4. Writes the JSON report and/or prints a summary

use crate::loader::{RawTable, SourceTables};
use crate::output::{generate_text_summary, write_report, ReportDocument};
use crate::pipeline::{load_config, run_pipeline, PipelineConfig, PipelineReport};
use crate::unifier::JoinMode;
use crate::utils::config::{BUSINESS_FILE, FACEBOOK_FILE, GOOGLE_FILE, TIKTOK_FILE};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Directory holding Facebook.csv, Google.csv, TikTok.csv, Business.csv
    pub data_dir: Option<PathBuf>,

    /// Per-table paths; each overrides the data directory lookup
    pub facebook: Option<PathBuf>,
    pub google: Option<PathBuf>,
    pub tiktok: Option<PathBuf>,
    pub business: Option<PathBuf>,

    /// Optional TOML pipeline configuration
    pub config_file: Option<PathBuf>,

    /// CLI values that win over the config file
    pub overrides: ConfigOverrides,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Rows per section in the text summary
    pub summary_lines: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            data_dir: Some(PathBuf::from("data")),
            facebook: None,
            google: None,
            tiktok: None,
            business: None,
            config_file: None,
            overrides: ConfigOverrides::default(),
            output_json: Some(PathBuf::from("report.json")),
            print_summary: false,
            summary_lines: 10,
        }
    }
}

/// Config fields settable from the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub window_size: Option<usize>,
    pub min_baseline_points: Option<usize>,
    pub anomaly_threshold: Option<f64>,
    pub join_mode: Option<JoinMode>,
    pub low_roas_threshold: Option<f64>,
    pub spike_sigma: Option<f64>,
    pub top_n: Option<usize>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ConfigOverrides {
    /// Overlay the set fields onto `config`
    pub fn apply(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(v) = self.window_size {
            config.window_size = v;
        }
        if let Some(v) = self.min_baseline_points {
            config.min_baseline_points = Some(v);
        }
        if let Some(v) = self.anomaly_threshold {
            config.anomaly_threshold = v;
        }
        if let Some(v) = self.join_mode {
            config.join_mode = v;
        }
        if let Some(v) = self.low_roas_threshold {
            config.low_roas_threshold = v;
        }
        if let Some(v) = self.spike_sigma {
            config.spike_sigma = v;
        }
        if let Some(v) = self.top_n {
            config.top_n = v;
        }
        if self.date_from.is_some() {
            config.date_from = self.date_from;
        }
        if self.date_to.is_some() {
            config.date_to = self.date_to;
        }
        config
    }
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The pipeline report, after any requested output was written
///
/// # Errors
/// * Config file unreadable or invalid
/// * Missing source files, missing columns, unparseable cells
/// * Report write failures
pub fn execute_analyze(args: AnalyzeArgs) -> Result<PipelineReport> {
    let start_time = Instant::now();

    // Step 1: Configuration
    info!("Step 1/4: Resolving configuration...");
    let config = resolve_config(&args)?;
    config.validate().context("Invalid pipeline configuration")?;
    debug!("Effective config: {:?}", config);

    // Step 2: Read sources
    info!("Step 2/4: Reading source tables...");
    let sources = read_sources(&args)?;

    // Step 3: Run pipeline
    info!("Step 3/4: Running pipeline...");
    let report = run_pipeline(&sources, &config).context("Pipeline run failed")?;

    // Each warning was logged where it was raised
    debug!("Pipeline returned {} warning(s)", report.warnings.len());

    // Step 4: Outputs
    info!("Step 4/4: Writing outputs...");
    if let Some(path) = &args.output_json {
        write_report(&ReportDocument::new(report.clone()), path)
            .context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    } else {
        info!("Skipping JSON report (no output path)");
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("MARKETING INTELLIGENCE SUMMARY");
        println!("{}", "=".repeat(80));
        println!("{}", generate_text_summary(&report, args.summary_lines));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    for (label, explicit, default_name) in table_specs(args) {
        if explicit.is_none() && args.data_dir.is_none() {
            anyhow::bail!(
                "No path for the {} table: pass --{} or --data-dir containing {}",
                label,
                label,
                default_name
            );
        }
    }

    if args.summary_lines == 0 {
        anyhow::bail!("summary_lines must be greater than 0");
    }

    if args.output_json.is_none() && !args.print_summary {
        anyhow::bail!("Nothing to do: set an output path or enable the summary");
    }

    Ok(())
}

/// Config file (if any) with CLI overrides applied
///
/// **Private** - internal helper for execute_analyze
fn resolve_config(args: &AnalyzeArgs) -> Result<PipelineConfig> {
    let base = match &args.config_file {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    Ok(args.overrides.apply(base))
}

/// Read all four tables from their resolved paths
///
/// **Private** - internal helper for execute_analyze
fn read_sources(args: &AnalyzeArgs) -> Result<SourceTables> {
    let [facebook, google, tiktok, business] = table_specs(args).map(|(label, explicit, default_name)| {
        resolve_table_path(explicit, args.data_dir.as_deref(), default_name)
            .with_context(|| format!("No path for the {} table", label))
    });

    Ok(SourceTables {
        facebook: read_table(&facebook?)?,
        google: read_table(&google?)?,
        tiktok: read_table(&tiktok?)?,
        business: read_table(&business?)?,
    })
}

fn read_table(path: &Path) -> Result<RawTable> {
    debug!("Reading {}", path.display());
    RawTable::from_path(path).with_context(|| format!("Failed to read source table {}", path.display()))
}

fn table_specs(args: &AnalyzeArgs) -> [(&'static str, Option<&Path>, &'static str); 4] {
    [
        ("facebook", args.facebook.as_deref(), FACEBOOK_FILE),
        ("google", args.google.as_deref(), GOOGLE_FILE),
        ("tiktok", args.tiktok.as_deref(), TIKTOK_FILE),
        ("business", args.business.as_deref(), BUSINESS_FILE),
    ]
}

/// Explicit path, else `<data_dir>/<default_name>`
///
/// **Public** - exposed for tests
pub fn resolve_table_path(explicit: Option<&Path>, data_dir: Option<&Path>, default_name: &str) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| data_dir.map(|dir| dir.join(default_name)))
}
