//! Error types for URL construction and browser launching.

use thiserror::Error;

/// Result type alias for browser-search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while building or opening URLs.
#[derive(Error, Debug)]
pub enum SearchError {
    /// A constructed URL could not be parsed.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Engine descriptor failed validation.
    #[error("Invalid engine '{0}': {1}")]
    InvalidEngine(String, String),

    /// Configuration file is malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O failure while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Opening a URL or application failed.
    #[error("Failed to launch '{0}': {1}")]
    Launch(String, String),
}

impl SearchError {
    /// Wraps a URL parse failure together with the offending input.
    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }
}
