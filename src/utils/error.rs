//! Error handling module
//!
//! Defines the dataset and provider error types used across the crate.
//! Startup and configuration paths use `anyhow` instead.

use std::path::PathBuf;
use thiserror::Error;

/// Dataset file errors
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The dataset file does not exist
    #[error("Dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but is not a valid list of records
    #[error("Dataset file is corrupt: {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Read, write or rename failed
    #[error("Dataset I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Records could not be serialized
    #[error("Failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DatasetError {
    /// Whether the driver should skip the file rather than report an I/O failure
    pub fn is_skippable(&self) -> bool {
        matches!(self, DatasetError::NotFound(_) | DatasetError::Corrupt { .. })
    }
}

/// Model provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network failure, timeout or body decoding failure
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Client errors (4xx) other than request timeout and rate limiting
    /// will fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Status { status, .. } => {
                !(400..500).contains(status) || *status == 408 || *status == 429
            }
            ProviderError::Request(_) | ProviderError::MalformedResponse(_) => true,
        }
    }
}

/// Result type alias for provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
