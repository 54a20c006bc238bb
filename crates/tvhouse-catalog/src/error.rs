//! Catalog error types.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;

/// Reasons a catalog refresh did not produce fresh data.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum CatalogError {
    /// The HTTP request could not be completed.
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("catalog endpoint returned HTTP {status}")]
    Status {
        /// Response status code.
        status: StatusCode,
    },

    /// The fetch did not complete within the allotted time.
    #[error("catalog fetch timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Reading or writing the cache file failed.
    #[error("cache file I/O failed for {}: {source}", .path.display())]
    Io {
        /// Cache file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The downloaded document is not a JSON array.
    #[error("catalog document is not a JSON array: {0}")]
    InvalidCatalog(#[source] serde_json::Error),

    /// The background fetch task panicked or was cancelled.
    #[error("catalog fetch task failed: {0}")]
    TaskFailed(String),
}
