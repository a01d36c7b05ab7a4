//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while loading the source tables
#[derive(Error, Debug)]
pub enum LoadError {
    /// A required column is missing, or the table is structurally unusable
    #[error("Data format error in {file}: {detail}")]
    DataFormat { file: String, detail: String },

    /// A cell could not be converted to the expected type
    #[error("Parse error in {file}, line {line}, column '{column}': cannot convert '{value}' ({reason})")]
    Parse {
        file: String,
        column: String,
        line: u64,
        value: String,
        reason: String,
    },

    #[error("Failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    pub(crate) fn missing_column(file: &str, aliases: &[&str]) -> Self {
        Self::DataFormat {
            file: file.to_string(),
            detail: format!("missing required column (expected one of: {})", aliases.join(", ")),
        }
    }
}

/// Errors raised by invalid pipeline configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Fatal errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
