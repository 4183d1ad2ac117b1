// src/page/mod.rs
// =============================================================================
// Everything that happens to a single page: fetching it and parsing it.
//
// Submodules:
// - http: GET with browser-like headers, timeout and redirect policy
// - html: title and link extraction
//
// The crawl loop only sees the re-exported API below.
// =============================================================================

mod html;
mod http;

pub use html::{parse, ParsedPage, MAX_RECORDED_LINKS, UNTITLED};
pub use http::{FetchedPage, PageFetcher, MAX_REDIRECTS};
pub(crate) use http::classify_error;
