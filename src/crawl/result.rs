// src/crawl/result.rs
// =============================================================================
// What a crawl produces: one PageResult per processed URL, in the order the
// URLs were dequeued, wrapped in a CrawlReport.
//
// Serialized as {"results": [...], "total": n} with camelCase fields.
// =============================================================================

use crate::error::FetchError;
use crate::page::ParsedPage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The record for one processed URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// The URL as it was dequeued (not the post-redirect URL)
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub links: Vec<String>,
    /// HTTP status, or 0 when no response arrived
    pub status: u16,
    pub depth: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    /// A page that was fetched (status < 500) and parsed
    pub fn success(url: String, depth: usize, status: u16, page: ParsedPage) -> Self {
        Self {
            url,
            title: page.title,
            links: page.links,
            status,
            depth,
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// A page that could not be fetched
    pub fn failure(url: String, depth: usize, error: &FetchError) -> Self {
        let detail = error.to_string();
        Self {
            url,
            title: format!("Error - {}", detail),
            links: Vec::new(),
            status: error.status(),
            depth,
            timestamp: Utc::now(),
            error: Some(detail),
        }
    }

    /// True for pages fetched without error and with a non-error status
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.status < 400
    }
}

/// The complete output of one crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlReport {
    pub results: Vec<PageResult>,
    pub total: usize,
}

impl From<Vec<PageResult>> for CrawlReport {
    fn from(results: Vec<PageResult>) -> Self {
        let total = results.len();
        Self { results, total }
    }
}
