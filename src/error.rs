//! Error types for portprobe.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-probe transport
//! failures never show up here; the prober folds them into a closed result.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole scan before any probe is dispatched.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot resolve target '{host}': {reason}")]
    NetworkSetup { host: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors raised while writing or reading report files.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to access '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV")]
    Csv(#[from] csv::Error),
}

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    DirectoryNotFound,

    #[error("failed to read '{}': {reason}", .path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Port(#[from] crate::types::PortError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not write {format} report")]
    Export {
        format: &'static str,
        #[source]
        source: ExportError,
    },

    #[error("console output failed")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// One-line message with every cause appended, `outer: inner: root`.
    pub fn chain(self) -> String {
        format!("{:#}", anyhow::Error::new(self))
    }
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
