//! Output writers for pipeline reports.
//!
//! This module handles:
//! - JSON report documents (write and read back)
//! - Text summaries for the terminal

pub mod json;
pub mod summary;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report, ReportDocument};
pub use summary::generate_text_summary;
