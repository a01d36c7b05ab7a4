//! Configuration and constants for the pipeline and CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default trailing window length (days) for the spend baseline
pub const DEFAULT_WINDOW_SIZE: usize = 7;

/// Default z-score cutoff for spend anomalies
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.0;

/// Smallest baseline that can produce a mean and a sample stddev
pub const MIN_BASELINE_POINTS: usize = 2;

/// Campaigns below this ROAS are reported as low performers
pub const DEFAULT_LOW_ROAS_THRESHOLD: f64 = 0.5;

/// Daily spend above mean + N * stddev (whole period) is a spike
pub const DEFAULT_SPIKE_SIGMA: f64 = 3.0;

/// Length of leaderboards in the report
pub const DEFAULT_TOP_N: usize = 10;
pub const MAX_TOP_N: usize = 1000;

// File names looked up inside a data directory
pub const FACEBOOK_FILE: &str = "Facebook.csv";
pub const GOOGLE_FILE: &str = "Google.csv";
pub const TIKTOK_FILE: &str = "TikTok.csv";
pub const BUSINESS_FILE: &str = "Business.csv";

// Column names (after header normalization) accepted for each field
pub const DATE_COLUMNS: &[&str] = &["date", "day"];
pub const CAMPAIGN_COLUMNS: &[&str] = &["campaign", "campaign_id", "campaign_name"];
pub const SPEND_COLUMNS: &[&str] = &["spend", "cost"];
pub const IMPRESSION_COLUMNS: &[&str] = &["impressions", "impression"];
pub const CLICK_COLUMNS: &[&str] = &["clicks", "click"];
pub const ATTRIBUTED_REVENUE_COLUMNS: &[&str] = &["attributed_revenue", "attributed_revenue_usd"];
pub const TACTIC_COLUMNS: &[&str] = &["tactic"];
pub const STATE_COLUMNS: &[&str] = &["state"];

pub const TOTAL_REVENUE_COLUMNS: &[&str] = &["total_revenue", "revenue"];
pub const ORDER_COLUMNS: &[&str] = &["total_orders", "#_of_orders", "orders"];
pub const NEW_ORDER_COLUMNS: &[&str] = &["#_of_new_orders", "new_orders"];
pub const NEW_CUSTOMER_COLUMNS: &[&str] = &["new_customers"];
pub const GROSS_PROFIT_COLUMNS: &[&str] = &["gross_profit"];
pub const COGS_COLUMNS: &[&str] = &["cogs"];

/// Date formats tried in order when parsing a date cell
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y"];
