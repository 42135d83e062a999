//! Collaborator-facing service operations
//!
//! One service instance owns the storage handle and HTTP client and exposes
//! the tenant-scoped operations: start a crawl, read status, search, list
//! recent pages, clear the index, and manage crawl settings.

use crate::config::Config;
use crate::crawler::{build_http_client, run_crawl, CrawlOutcome};
use crate::search::{search_pages, SearchHit, CONTEXT_SEARCH_LIMIT, DEFAULT_SEARCH_LIMIT};
use crate::state::{CrawlStatus, PageStatus};
use crate::storage::{open_storage, CrawlSettings, SettingsPatch, SqliteStorage, Storage};
use crate::{IndexError, Result};
use reqwest::Client;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Default number of pages returned by the recent-pages listing
pub const DEFAULT_RECENT_LIMIT: u32 = 50;

/// Snapshot of a tenant's crawl state
///
/// `total_pages_indexed` is the live page count, so a crawl's progress is
/// visible while it runs.
#[derive(Debug, Clone)]
pub struct CrawlStatusReport {
    pub status: CrawlStatus,
    pub total_pages_indexed: u64,
    pub last_crawl_at: Option<String>,
    pub last_error: Option<String>,
}

/// Listing row for the recent-pages view
#[derive(Debug, Clone)]
pub struct PageSummary {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub status: PageStatus,
    pub depth: u32,
    pub last_crawled_at: String,
    pub error: Option<String>,
}

/// The tenant page index service
pub struct SiteIndexService {
    storage: Arc<Mutex<SqliteStorage>>,
    config: Config,
    client: Client,
}

impl SiteIndexService {
    /// Opens the database from the configuration and builds the HTTP client
    pub fn new(config: Config) -> Result<Self> {
        let storage = open_storage(Path::new(&config.index.database_path))?;
        Self::with_storage(storage, config)
    }

    /// Builds a service around an existing storage instance
    pub fn with_storage(storage: SqliteStorage, config: Config) -> Result<Self> {
        let client = build_http_client(&config.crawler)?;
        Ok(Self {
            storage: Arc::new(Mutex::new(storage)),
            config,
            client,
        })
    }

    // ===== Crawling =====

    /// Runs a full crawl for the tenant
    ///
    /// Fails with a precondition error when no domain is configured, full
    /// crawl is disabled, or a crawl is already in progress.
    pub async fn start_crawl(&self, tenant: &str) -> Result<CrawlOutcome> {
        run_crawl(
            Arc::clone(&self.storage),
            &self.client,
            &self.config.crawler,
            tenant,
        )
        .await
    }

    /// Reads the tenant's crawl status and live page count
    pub fn crawl_status(&self, tenant: &str) -> Result<CrawlStatusReport> {
        let storage = self.storage.lock().unwrap();
        let settings = storage.get_crawl_settings(tenant)?;
        let total = storage.count_pages(tenant)?;
        Ok(CrawlStatusReport {
            status: settings.status,
            total_pages_indexed: total,
            last_crawl_at: settings.last_crawl_at,
            last_error: settings.last_error,
        })
    }

    // ===== Search =====

    /// Searches the tenant's crawled pages
    pub fn search_indexed_pages(
        &self,
        tenant: &str,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchHit>> {
        let storage = self.storage.lock().unwrap();
        let hits = search_pages(
            &*storage,
            tenant,
            query,
            limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        )?;
        Ok(hits)
    }

    /// Retrieves the top hits used as context for answering a question
    pub fn retrieve_context(&self, tenant: &str, query: &str) -> Result<Vec<SearchHit>> {
        self.search_indexed_pages(tenant, query, Some(CONTEXT_SEARCH_LIMIT))
    }

    // ===== Page Management =====

    /// Lists the tenant's most recently stored pages, newest first
    pub fn recent_pages(&self, tenant: &str, limit: Option<u32>) -> Result<Vec<PageSummary>> {
        let storage = self.storage.lock().unwrap();
        let pages = storage.recent_pages(tenant, limit.unwrap_or(DEFAULT_RECENT_LIMIT))?;
        Ok(pages
            .into_iter()
            .map(|p| PageSummary {
                id: p.id,
                url: p.url,
                title: p.title,
                status: p.status,
                depth: p.depth,
                last_crawled_at: p.last_crawled_at,
                error: p.error,
            })
            .collect())
    }

    /// Deletes every indexed page for the tenant and resets its crawl state
    ///
    /// Clearing during a running crawl is refused.
    pub fn clear_indexed_pages(&self, tenant: &str) -> Result<u64> {
        let mut storage = self.storage.lock().unwrap();
        let settings = storage.get_crawl_settings(tenant)?;
        if settings.status == CrawlStatus::InProgress {
            return Err(IndexError::Precondition(
                "cannot clear the index while a crawl is in progress".to_string(),
            ));
        }
        let deleted = storage.delete_all_pages(tenant)?;
        storage.reset_after_clear(tenant)?;
        Ok(deleted)
    }

    // ===== Settings =====

    /// Applies a partial settings update and returns the merged settings
    pub fn update_settings(&self, tenant: &str, patch: &SettingsPatch) -> Result<CrawlSettings> {
        let mut storage = self.storage.lock().unwrap();
        storage.update_crawl_settings(tenant, patch)?;
        Ok(storage.get_crawl_settings(tenant)?)
    }

    /// Reads the tenant's crawl settings
    pub fn get_settings(&self, tenant: &str) -> Result<CrawlSettings> {
        Ok(self.storage.lock().unwrap().get_crawl_settings(tenant)?)
    }
}
