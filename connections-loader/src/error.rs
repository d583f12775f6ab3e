//! Error types for row loading.

use thiserror::Error;

/// Errors raised while fetching or parsing connection rows.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The source string was empty.
    #[error("row source must be a file path or a URL")]
    EmptySource,

    /// Reading a local file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The data could not be parsed as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    /// A JSON body could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;
