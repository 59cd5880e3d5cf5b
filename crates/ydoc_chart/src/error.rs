//! Error types for chart metadata extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;

/// Errors that can occur while reading chart metadata.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Values file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid chart format in file {path}: {message}")]
    InvalidFormat { path: PathBuf, message: String },

    #[error("Invalid values file pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
