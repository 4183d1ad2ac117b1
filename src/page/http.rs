// src/page/http.rs
// =============================================================================
// This module fetches pages over HTTP.
//
// Key functionality:
// - One reqwest Client per crawl, carrying the timeout and redirect policy
// - Browser-like default headers (some servers block obvious bots)
// - Any status below 500 counts as a retrievable page, even 404
// - Failures are classified into FetchError variants whose Display text
//   becomes the per-page error detail (refused, timeout, DNS, HTTP 5xx...)
// =============================================================================

use crate::error::FetchError;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::{redirect, Client};
use std::error::Error as StdError;
use std::io;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Maximum redirect hops when redirects are followed
pub const MAX_REDIRECTS: usize = 5;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// A page that came back with a usable response (status < 500)
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    /// Where the response actually came from, after redirects
    pub final_url: Url,
    pub body: String,
}

/// Issues GET requests for the crawl loop.
///
/// Cheap to clone: reqwest's Client is reference counted internally.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Builds a fetcher with the per-page timeout and redirect policy of a crawl
    pub fn new(timeout: Duration, follow_redirects: bool) -> Result<Self, reqwest::Error> {
        let policy = if follow_redirects {
            redirect::Policy::limited(MAX_REDIRECTS)
        } else {
            redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(browser_headers())
            .timeout(timeout)
            .redirect(policy)
            .build()?;

        Ok(Self { client })
    }

    /// Fetches one page.
    ///
    /// Returns the status and body for anything below 500. Server errors and
    /// transport failures come back as a classified FetchError.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await.map_err(classify_error)?;

        let status = response.status();
        if status.is_server_error() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(classify_error)?;

        debug!(url, status = status.as_u16(), bytes = body.len(), "fetched page");

        Ok(FetchedPage {
            status: status.as_u16(),
            final_url,
            body,
        })
    }
}

// Headers a desktop browser would send with a top-level navigation.
// Accept-Encoding is left to reqwest so it can decode what it negotiates.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}

// Categorizes reqwest errors into the failure kinds we report.
//
// reqwest only tells us "this was a connect error"; whether it was a refused
// connection or a failed DNS lookup lives further down the source chain.
pub(crate) fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout;
    }
    if error.is_redirect() {
        return FetchError::TooManyRedirects;
    }

    let chain = error_chain(&error);

    if error.is_connect() {
        if chain.contains("dns error") || chain.contains("failed to lookup address") {
            return FetchError::HostNotFound;
        }
        if io_error_kind(&error) == Some(io::ErrorKind::ConnectionRefused)
            || chain.to_lowercase().contains("connection refused")
        {
            return FetchError::ConnectionRefused;
        }
        return FetchError::Connect(chain);
    }

    // Some timeouts surface as plain IO errors while reading the body
    if io_error_kind(&error) == Some(io::ErrorKind::TimedOut) {
        return FetchError::Timeout;
    }

    FetchError::Other(chain)
}

// Joins an error and all of its sources into one message
fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

// Finds the first io::Error in the source chain
fn io_error_kind(error: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut source: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(cause) = source {
        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            return Some(io_error.kind());
        }
        source = cause.source();
    }
    None
}
