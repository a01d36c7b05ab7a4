//! Non-fatal warnings collected during a pipeline run.
//!
//! Fatal problems live in `error.rs`. Everything here is accumulated,
//! logged at `warn` level, and returned alongside the report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A warning surfaced with the pipeline results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PipelineWarning {
    Join(JoinWarning),
    DataQuality(DataQualityWarning),
}

/// Channel dates that found no business record during unification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinWarning {
    /// Distinct channel dates without a business match
    pub unmatched_dates: usize,

    /// Source channel rows on those dates
    pub unmatched_rows: usize,

    /// Whether the rows were kept (outer join) or dropped (inner join)
    pub kept: bool,

    /// Earliest unmatched dates, for diagnosis
    pub sample_dates: Vec<NaiveDate>,
}

/// Suspicious input that does not stop the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// Channels claim more revenue than the business booked on a date
    OverAttribution {
        date: NaiveDate,
        attributed_revenue: f64,
        total_revenue: f64,
        /// Unclamped share; absent when total revenue is zero
        raw_share: Option<f64>,
    },

    /// A money column holds a negative amount
    NegativeValue {
        file: String,
        column: String,
        line: u64,
        value: f64,
    },

    /// The business table lists a date twice; the first row wins
    DuplicateBusinessDate {
        file: String,
        date: NaiveDate,
        line: u64,
    },
}

impl From<JoinWarning> for PipelineWarning {
    fn from(warning: JoinWarning) -> Self {
        Self::Join(warning)
    }
}

impl From<DataQualityWarning> for PipelineWarning {
    fn from(warning: DataQualityWarning) -> Self {
        Self::DataQuality(warning)
    }
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Join(w) => write!(
                f,
                "{} channel date(s) ({} rows) had no business record and were {}",
                w.unmatched_dates,
                w.unmatched_rows,
                if w.kept { "kept without total revenue" } else { "excluded" }
            ),
            Self::DataQuality(DataQualityWarning::OverAttribution {
                date,
                attributed_revenue,
                total_revenue,
                ..
            }) => write!(
                f,
                "over-attribution on {}: {:.2} attributed vs {:.2} total revenue",
                date, attributed_revenue, total_revenue
            ),
            Self::DataQuality(DataQualityWarning::NegativeValue { file, column, line, value }) => {
                write!(f, "negative {} ({}) in {} line {}", column, value, file, line)
            }
            Self::DataQuality(DataQualityWarning::DuplicateBusinessDate { file, date, line }) => {
                write!(f, "duplicate business date {} in {} line {} ignored", date, file, line)
            }
        }
    }
}
