// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling from a seed URL, bounded by a page budget
// - Visited-set deduplication so no URL is fetched twice
// - Per-page link cap so the frontier cannot explode
// - Polite crawling with a configurable delay between requests
// - Optional robots.txt compliance (literal prefix rules, fail open)
//
// Rust concepts:
// - Async programming: every network call is awaited in sequence
// - Collections: HashSet for tracking visited URLs, VecDeque for the queue
// =============================================================================

mod queue;
mod result;
mod robots;

pub use queue::{crawl, Crawler, Frontier, FrontierEntry, MAX_ENQUEUED_PER_PAGE};
pub use result::{CrawlReport, PageResult};
pub use robots::{
    robots_allows, robots_url, RobotsChecker, CRAWLER_NAME, ROBOTS_TIMEOUT, ROBOTS_USER_AGENT,
};
