//! Loading of the channel and business CSV exports.
//!
//! This module handles:
//! - Header normalization and column aliasing
//! - Date and numeric cell conversion
//! - Row-level error context (file, column, line)

pub mod reader;
pub mod schema;
pub mod table;

// Re-export main types
pub use reader::{load_business_table, load_channel_table, load_sources};
pub use schema::{BusinessRecord, Channel, ChannelRecord, LoadedData, RawTable, SourceTables};
