// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every crawl option is optional on the command line. Flags are collected
// into a CrawlRequest, layered over an optional JSON request file, and only
// then resolved into a CrawlConfig (where the defaults live).
// =============================================================================

use clap::{Args, Parser, Subcommand};
use spiderling::config::CrawlRequest;
use std::path::PathBuf;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "spiderling",
    version,
    about = "A small breadth-first web crawler",
    long_about = "spiderling starts from a seed URL, follows links breadth-first up to a \
                  page budget, and reports the title, status and links of every page it visited."
)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website starting from a URL
    ///
    /// Example: spiderling crawl https://example.com --max-pages 5 --delay-ms 200
    Crawl(CrawlArgs),

    /// Check whether robots.txt allows crawling a URL
    ///
    /// Example: spiderling robots https://example.com/private/page
    Robots {
        /// URL to check
        url: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct CrawlArgs {
    /// Seed URL (required unless given in --request)
    pub url: Option<String>,

    /// JSON crawl request file; flags given on the command line win over it
    ///
    /// Accepts {"url", "maxPages", "delayMs", "timeoutMs", "followRedirects", "respectRobots"}
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Maximum number of pages to record [default: 10]
    #[arg(long)]
    pub max_pages: Option<u64>,

    /// Pause between pages in milliseconds [default: 1000]
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Per-page request timeout in milliseconds [default: 10000]
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Do not follow HTTP redirects
    #[arg(long)]
    pub no_follow_redirects: bool,

    /// Skip URLs that robots.txt disallows
    #[arg(long)]
    pub respect_robots: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

impl CrawlArgs {
    /// The crawl options given as flags; unset flags stay None
    pub fn to_request(&self) -> CrawlRequest {
        CrawlRequest {
            url: self.url.clone(),
            max_pages: self.max_pages,
            delay_ms: self.delay_ms,
            timeout_ms: self.timeout_ms,
            follow_redirects: self.no_follow_redirects.then_some(false),
            respect_robots: self.respect_robots.then_some(true),
        }
    }
}
