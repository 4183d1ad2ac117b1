// src/page/html.rs
// =============================================================================
// This module turns a fetched HTML page into a title and a list of links.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM, tolerating broken markup like a browser does
// - Supports CSS selectors for finding elements
//
// We also use the `url` crate to resolve relative hrefs against the page URL.
//
// Nothing in here can fail: malformed HTML still parses, and hrefs that do not
// resolve to an http(s) URL are skipped one by one.
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Title used when a page has neither <title> nor <h1>
pub const UNTITLED: &str = "Untitled";

/// How many links are kept per page
pub const MAX_RECORDED_LINKS: usize = 5;

/// The parts of a page the crawler cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    pub title: String,
    /// Absolute http(s) URLs, unique, in document order, at most MAX_RECORDED_LINKS
    pub links: Vec<String>,
}

/// Parses an HTML document.
///
/// Example:
///   html = "<title>Docs</title><a href='/a'>A</a><a href='/a'>again</a>"
///   base_url = "https://example.com/"
///   result = ParsedPage { title: "Docs", links: ["https://example.com/a"] }
pub fn parse(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url, MAX_RECORDED_LINKS),
    }
}

// <title> first, then the first <h1>, then the placeholder
fn extract_title(document: &Html) -> String {
    // These selectors are constants and known to be valid
    let title = Selector::parse("title").unwrap();
    let h1 = Selector::parse("h1").unwrap();

    first_text(document, &title)
        .or_else(|| first_text(document, &h1))
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

// Text of an element with runs of whitespace collapsed
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_links(document: &Html, base: &Url, limit: usize) -> Vec<String> {
    let selector = Selector::parse("a[href]").unwrap();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(absolute_url) = resolve_url(base, href) else {
            continue;
        };

        if seen.insert(absolute_url.clone()) {
            links.push(absolute_url);
            if links.len() == limit {
                break;
            }
        }
    }

    links
}

// Resolves a possibly-relative href to an absolute http(s) URL
//
// Examples:
//   base = "https://example.com/page/"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other" -> Some("https://example.com/other")
//   href = "#top" -> None (same page)
//   href = "javascript:void(0)" -> None (not HTTP)
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    // join() handles both absolute and relative hrefs
    let url = base.join(href).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url.to_string()),
        _ => None,
    }
}
