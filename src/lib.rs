// src/lib.rs
// =============================================================================
// The crawl engine as a library.
//
// Modules:
// - config: CrawlRequest (what the caller sent) and CrawlConfig (resolved)
// - crawl: frontier, visited set, crawl loop, robots.txt check, results
// - page: fetching and parsing a single page
// - error: typed errors for configuration and page fetches
//
// The binary in main.rs is one caller; anything else that can build a
// CrawlConfig can run a crawl the same way:
//
//   let config = CrawlConfig::new("https://example.com")?;
//   let report = spiderling::crawl::crawl(config).await?;
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod page;

pub use config::{CrawlConfig, CrawlRequest};
pub use crawl::{crawl, CrawlReport, Crawler, PageResult};
pub use error::{ConfigError, CrawlError, FetchError};
