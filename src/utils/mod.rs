//! Utility modules for configuration, errors, and warnings.

pub mod error;
pub mod config;
pub mod warning;

// Re-export commonly used error types for convenience
pub use error::{ConfigError, LoadError, OutputError, PipelineError};
pub use warning::{DataQualityWarning, JoinWarning, PipelineWarning};
