//! Crawl orchestrator
//!
//! Runs the breadth-first crawl for one tenant: seeds the frontier from the
//! configured domain, enforces the page budget, depth bound, domain
//! confinement, and exclude patterns, and drives the status state machine
//! in storage.

use crate::config::CrawlerConfig;
use crate::crawler::extractor::{extract_links, extract_page_content};
use crate::crawler::fetcher::{fetch_page, FetchOutcome};
use crate::state::{CrawlStatus, PageStatus};
use crate::storage::{NewPage, SqliteStorage, Storage};
use crate::url::{extract_domain, matches_exclude, normalize_url};
use crate::IndexError;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Result of a completed crawl run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub success: bool,
    pub total_pages: u32,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// One pending URL on the crawl frontier
struct FrontierEntry {
    url: String,
    depth: u32,
    parent: Option<String>,
}

/// Runs a full crawl for the tenant
///
/// Checks the preconditions (configured domain, full crawl enabled, no
/// crawl already running), claims the `in_progress` status, walks the site
/// breadth-first, and records the terminal status. A storage failure
/// mid-crawl ends the run with status `error`; pages stored before the
/// failure are kept.
pub async fn run_crawl(
    storage: Arc<Mutex<SqliteStorage>>,
    client: &Client,
    config: &CrawlerConfig,
    tenant: &str,
) -> Result<CrawlOutcome, IndexError> {
    let settings = storage.lock().unwrap().get_crawl_settings(tenant)?;

    let domain = settings
        .domain
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| {
            IndexError::Precondition("no domain configured for this tenant".to_string())
        })?
        .to_string();

    if !settings.enable_full_crawl {
        return Err(IndexError::Precondition(
            "full crawl is not enabled for this tenant".to_string(),
        ));
    }

    // Bare hostnames get an https scheme; full URLs pass through
    let start_url = if domain.contains("://") {
        domain.clone()
    } else {
        format!("https://{}", domain)
    };

    let base_domain = extract_domain(&start_url);
    if base_domain.is_empty() {
        return Err(IndexError::Precondition(format!(
            "configured domain is not a valid host: {}",
            domain
        )));
    }

    if !storage.lock().unwrap().try_begin_crawl(tenant)? {
        return Err(IndexError::Precondition(
            "a crawl is already in progress for this tenant".to_string(),
        ));
    }

    info!(
        tenant = tenant,
        domain = %base_domain,
        max_pages = settings.max_pages,
        max_depth = settings.max_depth,
        "Starting crawl"
    );

    let (crawled, fatal) = crawl_loop(
        &storage,
        client,
        config,
        tenant,
        &start_url,
        &base_domain,
        settings.max_pages,
        settings.max_depth,
        &settings.exclude_patterns,
    )
    .await;

    match fatal {
        Some(error) => {
            warn!(tenant = tenant, error = %error, "Crawl failed");
            storage
                .lock()
                .unwrap()
                .finish_crawl(tenant, CrawlStatus::Error, crawled, Some(&error))?;
            Ok(CrawlOutcome {
                success: false,
                total_pages: crawled,
                message: None,
                error: Some(error),
            })
        }
        None => {
            info!(tenant = tenant, pages = crawled, "Crawl completed");
            storage
                .lock()
                .unwrap()
                .finish_crawl(tenant, CrawlStatus::Completed, crawled, None)?;
            Ok(CrawlOutcome {
                success: true,
                total_pages: crawled,
                message: Some(format!("Crawl completed: {} pages indexed", crawled)),
                error: None,
            })
        }
    }
}

/// The breadth-first walk itself
///
/// Returns the number of records stored and, if the loop stopped on a
/// storage failure, its message. Fetch failures are not fatal: they become
/// error records and count against the page budget like any other page.
#[allow(clippy::too_many_arguments)]
async fn crawl_loop(
    storage: &Arc<Mutex<SqliteStorage>>,
    client: &Client,
    config: &CrawlerConfig,
    tenant: &str,
    start_url: &str,
    base_domain: &str,
    max_pages: u32,
    max_depth: u32,
    exclude_patterns: &[String],
) -> (u32, Option<String>) {
    let mut frontier: VecDeque<FrontierEntry> = VecDeque::new();
    frontier.push_back(FrontierEntry {
        url: start_url.to_string(),
        depth: 0,
        parent: None,
    });

    let mut visited: HashSet<String> = HashSet::new();
    let mut crawled: u32 = 0;
    let mut first = true;

    while crawled < max_pages {
        let entry = match frontier.pop_front() {
            Some(entry) => entry,
            None => break,
        };

        // Rate limit between consecutive dequeues, skipped URLs included
        if !first && config.request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.request_delay_ms)).await;
        }
        first = false;

        let url = normalize_url(&entry.url, None);

        if !visited.insert(url.clone()) {
            continue;
        }
        if matches_exclude(&url, exclude_patterns) {
            debug!(url = %url, "Skipping excluded URL");
            continue;
        }

        // Parse before the confinement check; an unparseable URL would read
        // as an empty domain and vanish silently instead of leaving a record
        let page_url = match Url::parse(&url) {
            Ok(parsed) => parsed,
            Err(e) => {
                let message = format!("invalid URL: {}", e);
                let record = error_page(tenant, &url, entry.depth, &entry.parent, &message);
                match storage.lock().unwrap().upsert_page(&record) {
                    Ok(_) => crawled += 1,
                    Err(e) => return (crawled, Some(e.to_string())),
                }
                continue;
            }
        };

        if extract_domain(&url) != base_domain {
            debug!(url = %url, "Skipping off-domain URL");
            continue;
        }
        if entry.depth > max_depth {
            continue;
        }

        debug!(url = %url, depth = entry.depth, "Fetching page");

        match fetch_page(client, &url).await {
            FetchOutcome::Success { body } => {
                let content = extract_page_content(&body);
                let record = NewPage {
                    tenant: tenant.to_string(),
                    url: url.clone(),
                    title: content.title,
                    text_content: content.text_content,
                    html_snippet: content.html_snippet,
                    description: content.description,
                    keywords: content.keywords,
                    headings: content.headings,
                    depth: entry.depth,
                    status: PageStatus::Crawled,
                    parent_url: entry.parent.clone(),
                    error: None,
                };
                match storage.lock().unwrap().upsert_page(&record) {
                    Ok(_) => crawled += 1,
                    Err(e) => return (crawled, Some(e.to_string())),
                }

                // Links only grow the frontier while there is depth left
                if entry.depth < max_depth {
                    for link in extract_links(&body, &page_url) {
                        let child = normalize_url(&link, None);
                        if !visited.contains(&child) {
                            frontier.push_back(FrontierEntry {
                                url: child,
                                depth: entry.depth + 1,
                                parent: Some(url.clone()),
                            });
                        }
                    }
                }
            }
            FetchOutcome::Failure { message } => {
                warn!(url = %url, error = %message, "Page fetch failed");
                let record = error_page(tenant, &url, entry.depth, &entry.parent, &message);
                match storage.lock().unwrap().upsert_page(&record) {
                    Ok(_) => crawled += 1,
                    Err(e) => return (crawled, Some(e.to_string())),
                }
            }
        }
    }

    (crawled, None)
}

fn error_page(
    tenant: &str,
    url: &str,
    depth: u32,
    parent: &Option<String>,
    message: &str,
) -> NewPage {
    NewPage {
        tenant: tenant.to_string(),
        url: url.to_string(),
        title: "Error".to_string(),
        text_content: String::new(),
        html_snippet: String::new(),
        description: None,
        keywords: None,
        headings: Vec::new(),
        depth,
        status: PageStatus::Error,
        parent_url: parent.clone(),
        error: Some(message.to_string()),
    }
}
