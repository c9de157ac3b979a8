//! Error types for a scrape run.
//!
//! `ScrapeError` is what a run can fail with. `SinkError` is what a progress
//! sink reports back; the driver logs it and carries on.

use thiserror::Error;

/// Fatal outcomes of a scrape run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Seed or derived URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No parser is registered for the URL's host.
    #[error("No parser available for site '{0}'")]
    UnsupportedSite(String),

    /// The request itself is malformed.
    #[error("Invalid scrape request: {0}")]
    InvalidRequest(String),

    /// The page could not be fetched after all retry attempts.
    #[error("Fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failed to build the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The caller cancelled the run.
    #[error("Scrape cancelled")]
    Cancelled,
}

/// A progress sink failed to take an event.
#[derive(Debug, Error)]
#[error("Progress sink delivery failed: {0}")]
pub struct SinkError(pub String);

/// Result type alias for scrape operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;
