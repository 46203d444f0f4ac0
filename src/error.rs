//! Error types for the varejo-etl library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the varejo-etl pipeline.
#[derive(Error, Debug)]
pub enum EtlError {
    /// A required input extract does not exist on disk
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// An input extract is missing a required column
    #[error("Missing required column '{column}' in {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// Errors reading or parsing a CSV extract
    #[error("Failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The price column has missing values but no usable values to average
    #[error("Cannot impute missing prices: the price column has no non-null values")]
    PriceColumnEmpty,

    /// Errors writing the enriched output
    #[error("Failed to write {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with EtlError
pub type Result<T> = std::result::Result<T, EtlError>;

impl From<anyhow::Error> for EtlError {
    fn from(err: anyhow::Error) -> Self {
        EtlError::Other(err.to_string())
    }
}
