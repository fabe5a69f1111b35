//! Error types for the salience library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for salience operations.
#[derive(Debug, Error)]
pub enum SalienceError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Sentence segmentation failed for a document.
    #[error("Segmentation error: {0}")]
    Segmentation(String),

    /// The generation service failed or returned an unusable batch.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Near-JSON text could not be repaired into valid JSON.
    #[error("Could not repair structured output: {message}")]
    Repair { message: String, raw: String },

    /// A rating value outside the ordinal scale or not a number.
    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    /// Empty input where data is required.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the CSV writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SalienceError {
    /// Build an IO error that remembers which path failed.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for salience operations.
pub type Result<T> = std::result::Result<T, SalienceError>;
