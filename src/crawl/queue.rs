// src/crawl/queue.rs
// =============================================================================
// This module implements the crawl itself with a breadth-first approach.
//
// How it works:
// 1. Start with the seed URL in a queue at depth 0
// 2. Pop the front entry; skip it if it was already visited
// 3. Optionally ask robots.txt; a disallowed URL is marked visited and skipped
// 4. Mark visited, fetch, parse, record one PageResult
// 5. Enqueue up to MAX_ENQUEUED_PER_PAGE unvisited links at depth + 1
// 6. Wait for the politeness delay, then repeat
// The loop stops when the queue is empty or max_pages results exist.
//
// Everything is sequential: one request in flight at a time, which keeps the
// request rate towards a site predictable and needs no locking.
// =============================================================================

use super::result::{CrawlReport, PageResult};
use super::robots::RobotsChecker;
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::page::{self, PageFetcher};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};
use url::Url;

/// How many links from one page may enter the frontier
pub const MAX_ENQUEUED_PER_PAGE: usize = 2;

/// A URL waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    /// How many link hops from the seed URL
    pub depth: usize,
}

/// FIFO work queue plus the set of URLs already dequeued.
///
/// The visited check on enqueue is best effort: the same URL can sit in the
/// queue twice if it was found twice before either copy was dequeued. The
/// second copy is dropped at dequeue time.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    /// A frontier holding only the seed URL at depth 0
    pub fn seeded(url: &str) -> Self {
        let mut frontier = Self::default();
        frontier.queue.push_back(FrontierEntry {
            url: url.to_string(),
            depth: 0,
        });
        frontier
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Adds a URL unless it has already been visited; returns whether it was added
    pub fn enqueue(&mut self, url: &str, depth: usize) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.queue.push_back(FrontierEntry {
            url: url.to_string(),
            depth,
        });
        true
    }

    /// Enqueues up to MAX_ENQUEUED_PER_PAGE of `links` at `depth`, in order.
    ///
    /// Visited links are passed over without using up the cap. Returns how
    /// many links were actually added.
    pub fn enqueue_links(&mut self, links: &[String], depth: usize) -> usize {
        let mut enqueued = 0;
        for link in links {
            if enqueued == MAX_ENQUEUED_PER_PAGE {
                break;
            }
            if self.enqueue(link, depth) {
                enqueued += 1;
            }
        }
        enqueued
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Whether any queued entry would still be processed when dequeued
    pub fn has_unvisited(&self) -> bool {
        self.queue.iter().any(|e| !self.visited.contains(&e.url))
    }

    /// Records a dequeued URL; returns false if it was already recorded
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

/// Runs crawls with one resolved configuration.
///
/// A Crawler owns its HTTP clients and nothing else; every call to run()
/// starts from a fresh frontier, so it can be reused or run concurrently.
#[derive(Debug, Clone)]
pub struct Crawler {
    config: CrawlConfig,
    fetcher: PageFetcher,
    robots: RobotsChecker,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = PageFetcher::new(config.timeout, config.follow_redirects)?;
        let robots = RobotsChecker::new()?;
        Ok(Self {
            config,
            fetcher,
            robots,
        })
    }

    /// Crawls from the seed URL until the budget is met or the frontier is empty.
    ///
    /// Never fails: per-page problems are recorded in the returned results.
    pub async fn run(&self) -> CrawlReport {
        let max_pages = self.config.max_pages;
        let mut frontier = Frontier::seeded(self.config.start_url.as_str());
        let mut results: Vec<PageResult> = Vec::new();

        info!(
            start_url = %self.config.start_url,
            max_pages,
            respect_robots = self.config.respect_robots,
            "starting crawl"
        );

        while results.len() < max_pages {
            let Some(entry) = frontier.pop() else {
                break;
            };

            if frontier.is_visited(&entry.url) {
                debug!(url = %entry.url, "already visited, skipping");
                continue;
            }

            if self.config.respect_robots && !self.robots_allow(&entry.url).await {
                info!(url = %entry.url, "robots.txt disallows crawling, skipping");
                frontier.mark_visited(&entry.url);
                continue;
            }

            frontier.mark_visited(&entry.url);

            let record = self.process(&entry).await;
            let room_left = max_pages - results.len() - 1;
            let enqueued = follow_links(&mut frontier, &record, room_left);
            debug!(url = %entry.url, enqueued, "links enqueued");
            results.push(record);

            // No pause once the loop is about to stop
            let more_to_do = room_left > 0 && frontier.has_unvisited();
            if more_to_do && !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }
        }

        info!(
            pages = results.len(),
            visited = frontier.visited_count(),
            pending = frontier.len(),
            "crawl finished"
        );

        CrawlReport::from(results)
    }

    async fn robots_allow(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => self.robots.is_allowed(&parsed, true).await,
            // Frontier URLs come from Url::to_string, so this is unreachable in practice
            Err(_) => true,
        }
    }

    // Fetch + parse one entry into its record
    async fn process(&self, entry: &FrontierEntry) -> PageResult {
        info!(depth = entry.depth, url = %entry.url, "crawling");

        match self.fetcher.fetch(&entry.url).await {
            Ok(fetched) => {
                let parsed = page::parse(&fetched.body, &fetched.final_url);
                PageResult::success(entry.url.clone(), entry.depth, fetched.status, parsed)
            }
            Err(e) => {
                warn!(url = %entry.url, error = %e, "failed to crawl page");
                PageResult::failure(entry.url.clone(), entry.depth, &e)
            }
        }
    }
}

// Links only enter the frontier while the budget still has room
fn follow_links(frontier: &mut Frontier, record: &PageResult, room_left: usize) -> usize {
    if room_left == 0 {
        return 0;
    }
    frontier.enqueue_links(&record.links, record.depth + 1)
}

/// Builds a Crawler for `config` and runs it once
pub async fn crawl(config: CrawlConfig) -> Result<CrawlReport, CrawlError> {
    let crawler = Crawler::new(config)?;
    Ok(crawler.run().await)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why mark visited at dequeue time, not enqueue time?
//    - A URL can be discovered many times before it is fetched
//    - Marking on dequeue means the first copy to reach the front wins and
//      every later copy is dropped by the is_visited() check
//    - The enqueue-time check only keeps obviously stale URLs out
//
// 2. What is let-else?
//    - let Some(entry) = frontier.pop() else { break; };
//    - Binds `entry` if the pattern matches, otherwise runs the else block,
//      which must leave the scope (break, continue, return)
//
// 3. Why tokio::time::sleep and not std::thread::sleep?
//    - The async sleep yields to the runtime instead of blocking the thread
//    - Other crawls running on the same runtime keep making progress
//
// 4. Why is run() taking &self?
//    - All per-crawl state (frontier, results) lives inside run()
//    - The Crawler itself only holds configuration and HTTP clients, so the
//      same Crawler can run several crawls, even at the same time
// -----------------------------------------------------------------------------
