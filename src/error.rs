// src/error.rs
// =============================================================================
// Typed errors for the crawl engine.
//
// There are three families:
// - ConfigError: the crawl request is unusable, the crawl never starts
// - FetchError: one page could not be retrieved; recorded, never fatal
// - CrawlError: setup failed before the first page (config or HTTP client)
//
// The Display text of each FetchError variant is exactly the detail string
// that ends up in PageResult.error, so keep them human-readable.
// =============================================================================

use thiserror::Error;

/// Problems with a crawl request, detected before any network traffic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported URL scheme '{0}' (only http and https can be crawled)")]
    UnsupportedScheme(String),

    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },

    #[error("Could not read crawl request: {0}")]
    Request(String),
}

/// Why a single page fetch failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Connection refused - server may be down")]
    ConnectionRefused,

    #[error("Request timed out - server may be slow")]
    Timeout,

    #[error("Domain not found - check the URL")]
    HostNotFound,

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// The status code to record for this failure (0 when no response arrived)
    pub fn status(&self) -> u16 {
        match self {
            FetchError::HttpStatus { status, .. } => *status,
            _ => 0,
        }
    }
}

/// Errors that stop a crawl before it starts.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
