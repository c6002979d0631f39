//! Error types for the radar library.

use thiserror::Error;

/// Result type alias for radar operations.
pub type Result<T> = std::result::Result<T, RadarError>;

/// Why a single provider query was abandoned.
///
/// Every kind aborts the whole `query` call; no partial page set is
/// ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    /// Transport error or non-success HTTP status.
    #[error("failed to fetch search results: {0}")]
    FetchFailed(String),

    /// The page body was blank.
    #[error("empty search results")]
    EmptyResponse,

    /// The extraction pattern found nothing in a non-empty page.
    #[error("failed to extract result urls")]
    ExtractionFailed,

    /// Pattern matching ran past its time budget.
    #[error("matching timeout")]
    ExtractionTimeout,
}

/// Errors that can occur during scans.
#[derive(Error, Debug)]
pub enum RadarError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Blank keyword or malformed address.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Provider or radar configuration rejected at construction.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The radar has no providers to scan.
    #[error("No search providers configured")]
    NoProviders,

    /// A provider query failed at the given page offset.
    #[error("Provider '{provider}' failed at offset {start}: {kind}")]
    Provider {
        provider: String,
        start: usize,
        kind: ProviderFailure,
    },
}

impl RadarError {
    /// Returns the failure kind when this is a provider-level error.
    pub fn failure(&self) -> Option<&ProviderFailure> {
        match self {
            RadarError::Provider { kind, .. } => Some(kind),
            _ => None,
        }
    }
}
