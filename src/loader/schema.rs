//! Record types produced by the loader and the raw tables it reads.

use crate::utils::config::{BUSINESS_FILE, FACEBOOK_FILE, GOOGLE_FILE, TIKTOK_FILE};
use crate::utils::error::LoadError;
use crate::utils::warning::PipelineWarning;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Advertising channel a record was exported from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    Facebook,
    Google,
    TikTok,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Facebook, Channel::Google, Channel::TikTok];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Google => "Google",
            Self::TikTok => "TikTok",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "facebook" | "fb" | "meta" => Ok(Self::Facebook),
            "google" | "google_ads" | "adwords" => Ok(Self::Google),
            "tiktok" | "tik_tok" => Ok(Self::TikTok),
            other => Err(format!("unknown channel '{}'", other)),
        }
    }
}

/// One row of a channel export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub date: NaiveDate,
    pub channel: Channel,
    pub campaign_id: String,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub attributed_revenue: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tactic: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// One row of the business export (one per date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub date: NaiveDate,
    pub total_revenue: f64,
    pub total_orders: u64,
    pub new_customers: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_orders: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_profit: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cogs: Option<f64>,
}

/// Raw CSV text plus the name used in error messages
#[derive(Debug, Clone)]
pub struct RawTable {
    pub name: String,
    pub content: String,
}

impl RawTable {
    /// Wrap in-memory CSV text
    pub fn from_text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a CSV file from disk
    ///
    /// # Errors
    /// * `LoadError::Io` - file missing or unreadable
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            file: name.clone(),
            source,
        })?;

        Ok(Self { name, content })
    }
}

/// The four source tables a pipeline run consumes
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub facebook: RawTable,
    pub google: RawTable,
    pub tiktok: RawTable,
    pub business: RawTable,
}

impl SourceTables {
    /// Read `Facebook.csv`, `Google.csv`, `TikTok.csv` and `Business.csv`
    /// from a data directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        Ok(Self {
            facebook: RawTable::from_path(dir.join(FACEBOOK_FILE))?,
            google: RawTable::from_path(dir.join(GOOGLE_FILE))?,
            tiktok: RawTable::from_path(dir.join(TIKTOK_FILE))?,
            business: RawTable::from_path(dir.join(BUSINESS_FILE))?,
        })
    }

    /// Channel tables paired with the channel they describe
    pub fn channel_tables(&self) -> [(Channel, &RawTable); 3] {
        [
            (Channel::Facebook, &self.facebook),
            (Channel::Google, &self.google),
            (Channel::TikTok, &self.tiktok),
        ]
    }
}

/// Output of the loader stage
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub channel_records: Vec<ChannelRecord>,
    pub business_records: Vec<BusinessRecord>,
    pub warnings: Vec<PipelineWarning>,
}
