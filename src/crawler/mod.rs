//! Crawler module
//!
//! This module implements the breadth-first site crawl, including:
//! - HTTP fetching with timeout and error classification
//! - Content extraction from raw HTML
//! - The crawl orchestrator enforcing budgets, depth, domain confinement,
//!   and exclude patterns

mod extractor;
mod fetcher;
mod orchestrator;

pub use extractor::{extract_links, extract_page_content, ExtractedContent};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use orchestrator::{run_crawl, CrawlOutcome};
