// src/config.rs
// =============================================================================
// Crawl configuration.
//
// A crawl is described twice:
// - CrawlRequest: what the caller sent. Every field is optional, so it can be
//   filled from a JSON request file, from CLI flags, or both.
// - CrawlConfig: the fully resolved value the engine runs with. Defaults are
//   applied field by field during resolution and the result never changes
//   for the lifetime of the crawl.
//
// Resolution is the only place configuration errors can happen. Once a
// CrawlConfig exists, the crawl itself never fails as a whole.
// =============================================================================

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MAX_PAGES: usize = 10;
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_FOLLOW_REDIRECTS: bool = true;
pub const DEFAULT_RESPECT_ROBOTS: bool = false;

/// An unresolved crawl request, as received from the outside world.
///
/// JSON field names follow the request body the crawler has always accepted:
/// `url`, `maxPages`, `delayMs` (or `delay`), `timeoutMs` (or `timeout`),
/// `followRedirects` and `respectRobots`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub max_pages: Option<u64>,
    #[serde(default, alias = "delay")]
    pub delay_ms: Option<u64>,
    #[serde(default, alias = "timeout")]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub follow_redirects: Option<bool>,
    #[serde(default)]
    pub respect_robots: Option<bool>,
}

impl CrawlRequest {
    /// Parses a request from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Request(e.to_string()))
    }

    /// Reads and parses a JSON request file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Request(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Layers `overrides` on top of `self`: any field set in `overrides` wins
    pub fn merge(self, overrides: CrawlRequest) -> CrawlRequest {
        CrawlRequest {
            url: overrides.url.or(self.url),
            max_pages: overrides.max_pages.or(self.max_pages),
            delay_ms: overrides.delay_ms.or(self.delay_ms),
            timeout_ms: overrides.timeout_ms.or(self.timeout_ms),
            follow_redirects: overrides.follow_redirects.or(self.follow_redirects),
            respect_robots: overrides.respect_robots.or(self.respect_robots),
        }
    }
}

/// The resolved configuration of one crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    pub start_url: Url,
    pub max_pages: usize,
    pub delay: Duration,
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub respect_robots: bool,
}

impl CrawlConfig {
    /// A config for `start_url` with every other field at its default
    pub fn new(start_url: &str) -> Result<Self, ConfigError> {
        CrawlRequest {
            url: Some(start_url.to_string()),
            ..CrawlRequest::default()
        }
        .try_into()
    }
}

impl TryFrom<CrawlRequest> for CrawlConfig {
    type Error = ConfigError;

    fn try_from(request: CrawlRequest) -> Result<Self, Self::Error> {
        let raw_url = request
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingUrl)?;
        let start_url = parse_start_url(raw_url)?;

        let max_pages = request.max_pages.unwrap_or(DEFAULT_MAX_PAGES as u64);
        if max_pages == 0 {
            return Err(ConfigError::NotPositive { field: "maxPages" });
        }

        let timeout_ms = request.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::NotPositive { field: "timeoutMs" });
        }

        Ok(CrawlConfig {
            start_url,
            max_pages: usize::try_from(max_pages).unwrap_or(usize::MAX),
            delay: Duration::from_millis(request.delay_ms.unwrap_or(DEFAULT_DELAY_MS)),
            timeout: Duration::from_millis(timeout_ms),
            follow_redirects: request.follow_redirects.unwrap_or(DEFAULT_FOLLOW_REDIRECTS),
            respect_robots: request.respect_robots.unwrap_or(DEFAULT_RESPECT_ROBOTS),
        })
    }
}

fn parse_start_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: "URL has no host".to_string(),
        });
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_per_field() {
        let config = CrawlConfig::new("https://example.test/").unwrap();
        assert_eq!(config.start_url.as_str(), "https://example.test/");
        assert_eq!(config.max_pages, 10);
        assert_eq!(config.delay, Duration::from_millis(1000));
        assert_eq!(config.timeout, Duration::from_millis(10_000));
        assert!(config.follow_redirects);
        assert!(!config.respect_robots);
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let err = CrawlConfig::try_from(CrawlRequest::default()).unwrap_err();
        assert_eq!(err, ConfigError::MissingUrl);

        let blank = CrawlRequest {
            url: Some("   ".to_string()),
            ..CrawlRequest::default()
        };
        assert_eq!(CrawlConfig::try_from(blank).unwrap_err(), ConfigError::MissingUrl);
    }

    #[test]
    fn test_rejects_relative_and_non_http_urls() {
        assert!(matches!(
            CrawlConfig::new("/just/a/path"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert_eq!(
            CrawlConfig::new("ftp://example.test/file").unwrap_err(),
            ConfigError::UnsupportedScheme("ftp".to_string())
        );
    }

    #[test]
    fn test_zero_budget_and_timeout_rejected() {
        let request = CrawlRequest {
            url: Some("https://example.test".to_string()),
            max_pages: Some(0),
            ..CrawlRequest::default()
        };
        assert_eq!(
            CrawlConfig::try_from(request).unwrap_err(),
            ConfigError::NotPositive { field: "maxPages" }
        );

        let request = CrawlRequest {
            url: Some("https://example.test".to_string()),
            timeout_ms: Some(0),
            ..CrawlRequest::default()
        };
        assert_eq!(
            CrawlConfig::try_from(request).unwrap_err(),
            ConfigError::NotPositive { field: "timeoutMs" }
        );
    }

    #[test]
    fn test_zero_delay_is_allowed() {
        let request = CrawlRequest {
            url: Some("https://example.test".to_string()),
            delay_ms: Some(0),
            ..CrawlRequest::default()
        };
        let config = CrawlConfig::try_from(request).unwrap();
        assert_eq!(config.delay, Duration::ZERO);
    }

    #[test]
    fn test_request_json_accepts_legacy_names() {
        let request = CrawlRequest::from_json(
            r#"{"url":"https://example.test","maxPages":3,"delay":100,
                "timeout":5000,"respectRobots":true}"#,
        )
        .unwrap();
        assert_eq!(request.max_pages, Some(3));
        assert_eq!(request.delay_ms, Some(100));
        assert_eq!(request.timeout_ms, Some(5000));
        assert_eq!(request.respect_robots, Some(true));
        assert_eq!(request.follow_redirects, None);

        let config = CrawlConfig::try_from(request).unwrap();
        assert_eq!(config.max_pages, 3);
        assert!(config.follow_redirects);
    }

    #[test]
    fn test_reads_request_file() {
        let request = CrawlRequest::from_file(Path::new("demos/respectful-crawl.json")).unwrap();
        let config = CrawlConfig::try_from(request).unwrap();
        assert_eq!(config.start_url.as_str(), "https://example.com/");
        assert_eq!(config.max_pages, 5);
        assert_eq!(config.delay, Duration::from_millis(2000));
        assert!(config.respect_robots);

        assert!(matches!(
            CrawlRequest::from_file(Path::new("demos/does-not-exist.json")),
            Err(ConfigError::Request(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_request_error() {
        assert!(matches!(
            CrawlRequest::from_json("{not json"),
            Err(ConfigError::Request(_))
        ));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let from_file = CrawlRequest {
            url: Some("https://file.test".to_string()),
            max_pages: Some(4),
            delay_ms: Some(50),
            ..CrawlRequest::default()
        };
        let from_flags = CrawlRequest {
            max_pages: Some(8),
            respect_robots: Some(true),
            ..CrawlRequest::default()
        };

        let merged = from_file.merge(from_flags);
        assert_eq!(merged.url.as_deref(), Some("https://file.test"));
        assert_eq!(merged.max_pages, Some(8));
        assert_eq!(merged.delay_ms, Some(50));
        assert_eq!(merged.respect_robots, Some(true));
    }
}
