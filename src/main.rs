// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, written to stderr)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the report and exit with a proper code
//    (0 = every page fine, 1 = some pages failed, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, CrawlArgs};
use spiderling::crawl::{CrawlReport, Crawler, PageResult, RobotsChecker};
use spiderling::{CrawlConfig, CrawlRequest};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Crawl(args) => handle_crawl(&args).await,
        Commands::Robots { url } => handle_robots(&url).await,
    }
}

// Logs go to stderr so --json output on stdout stays clean
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

// Handles the 'crawl' subcommand
async fn handle_crawl(args: &CrawlArgs) -> Result<i32> {
    let request = match &args.request {
        Some(path) => CrawlRequest::from_file(path)?.merge(args.to_request()),
        None => args.to_request(),
    };
    let config = CrawlConfig::try_from(request)?;

    if !args.json {
        println!("🔍 Crawling: {}", config.start_url);
        println!("📊 Page budget: {}", config.max_pages);
    }

    let crawler = Crawler::new(config)?;
    let started = Instant::now();
    let report = crawler.run().await;
    let elapsed = started.elapsed();

    print_results(&report, elapsed, args.json)?;

    let failed = report.results.iter().filter(|r| !r.is_ok()).count();
    Ok(if failed > 0 { 1 } else { 0 })
}

// Handles the 'robots' subcommand
async fn handle_robots(url: &str) -> Result<i32> {
    let url = Url::parse(url).with_context(|| format!("Invalid URL '{}'", url))?;
    let checker = RobotsChecker::new()?;

    if checker.is_allowed(&url, true).await {
        println!("✅ Allowed: {}", url);
        Ok(0)
    } else {
        println!("🚫 Disallowed by robots.txt: {}", url);
        Ok(1)
    }
}

// Prints the report either as a table or JSON
fn print_results(report: &CrawlReport, elapsed: Duration, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(&report.results, elapsed);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(results: &[PageResult], elapsed: Duration) {
    println!();
    println!("{:<6} {:<52} {:<8} {:<6} {}", "DEPTH", "URL", "STATUS", "LINKS", "TITLE");
    println!("{}", "=".repeat(105));

    for result in results {
        println!(
            "{:<6} {:<52} {:<8} {:<6} {}",
            result.depth,
            truncate(&result.url, 52),
            format_status(result),
            result.links.len(),
            truncate(&result.title, 40),
        );
    }

    println!();

    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    let failed_count = results.len() - ok_count;
    let max_depth = results.iter().map(|r| r.depth).max().unwrap_or(0);

    println!("📊 Summary:");
    println!("   ✅ OK: {}", ok_count);
    println!("   ❌ Failed: {}", failed_count);
    println!("   🌳 Deepest level: {}", max_depth);
    println!("   📏 Average depth: {:.1}", average_depth(results));
    println!("   ⏱️  Duration: {:.2}s", elapsed.as_secs_f64());
    println!("   📋 Total: {}", results.len());
}

fn average_depth(results: &[PageResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let sum: usize = results.iter().map(|r| r.depth).sum();
    sum as f64 / results.len() as f64
}

fn format_status(result: &PageResult) -> String {
    match (result.status, &result.error) {
        (0, Some(_)) => "ERROR".to_string(),
        (status, _) => status.to_string(),
    }
}

// Shortens text for a fixed-width column without splitting a character
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
