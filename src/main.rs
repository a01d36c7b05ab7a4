//! Marketing Intel CLI
//!
//! Joins ad-channel exports with business metrics and reports ROAS,
//! attribution, campaign leaderboards and spend anomalies.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use marketing_intel::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs, ConfigOverrides,
};
use marketing_intel::unifier::JoinMode;

/// Marketing Intel - channel performance and spend anomaly reports
#[derive(Parser, Debug)]
#[command(name = "marketing-intel")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the pipeline over the four CSV exports
    Analyze {
        /// Directory with Facebook.csv, Google.csv, TikTok.csv, Business.csv
        #[arg(short, long, env = "MARKETING_INTEL_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,

        /// Facebook export (overrides the data directory)
        #[arg(long)]
        facebook: Option<PathBuf>,

        /// Google export (overrides the data directory)
        #[arg(long)]
        google: Option<PathBuf>,

        /// TikTok export (overrides the data directory)
        #[arg(long)]
        tiktok: Option<PathBuf>,

        /// Business metrics export (overrides the data directory)
        #[arg(long)]
        business: Option<PathBuf>,

        /// TOML pipeline configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Skip writing the JSON report
        #[arg(long)]
        no_output: bool,

        /// Trailing window length for the spend baseline
        #[arg(long)]
        window: Option<usize>,

        /// Prior points required before a verdict (defaults to the window)
        #[arg(long)]
        min_baseline: Option<usize>,

        /// z-score cutoff for spend anomalies
        #[arg(long)]
        threshold: Option<f64>,

        /// Date alignment: inner or outer
        #[arg(long)]
        join_mode: Option<JoinMode>,

        /// ROAS below which a campaign is flagged
        #[arg(long)]
        low_roas: Option<f64>,

        /// Spike rule: daily spend > mean + N x stddev
        #[arg(long)]
        spike_sigma: Option<f64>,

        /// Leaderboard length
        #[arg(long)]
        top: Option<usize>,

        /// First date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Rows per summary section
        #[arg(long, default_value = "10")]
        summary_lines: usize,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            data_dir,
            facebook,
            google,
            tiktok,
            business,
            config,
            output,
            no_output,
            window,
            min_baseline,
            threshold,
            join_mode,
            low_roas,
            spike_sigma,
            top,
            from,
            to,
            summary,
            summary_lines,
        } => {
            let args = AnalyzeArgs {
                data_dir: Some(data_dir),
                facebook,
                google,
                tiktok,
                business,
                config_file: config,
                overrides: ConfigOverrides {
                    window_size: window,
                    min_baseline_points: min_baseline,
                    anomaly_threshold: threshold,
                    join_mode,
                    low_roas_threshold: low_roas,
                    spike_sigma,
                    top_n: top,
                    date_from: from,
                    date_to: to,
                },
                output_json: (!no_output).then_some(output),
                print_summary: summary,
                summary_lines,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
