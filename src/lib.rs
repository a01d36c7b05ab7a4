//! Marketing Intel
//!
//! Loads ad-channel exports (Facebook, Google, TikTok) and business
//! metrics, joins them per date, and derives ROAS, attribution share,
//! campaign leaderboards and spend anomalies.
//!
//! The stages are plain functions:
//!
//! ```ignore
//! use marketing_intel::loader::SourceTables;
//! use marketing_intel::pipeline::{run_pipeline, PipelineConfig};
//!
//! let sources = SourceTables::from_dir("data")?;
//! let report = run_pipeline(&sources, &PipelineConfig::default())?;
//! ```
//!
//! The `marketing-intel` binary wraps this with a CLI that writes a JSON
//! report and can print a text summary.

pub mod anomaly;
pub mod commands;
pub mod loader;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod unifier;
pub mod utils;
