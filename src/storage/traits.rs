//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::state::{CrawlStatus, PageStatus};
use crate::storage::{CrawlSettings, NewPage, PageRecord, SettingsPatch};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines all persistence operations needed by the crawler and
/// its collaborators. Any backend works as long as the (tenant, url) upsert
/// key and the field semantics hold.
pub trait Storage {
    // ===== Page Management =====

    /// Inserts or overwrites the record for (tenant, canonical URL)
    ///
    /// All non-key fields are replaced and `last_crawled_at` is set to now.
    /// Returns the record's identity.
    fn upsert_page(&mut self, page: &NewPage) -> StorageResult<i64>;

    /// Gets a page by its (tenant, canonical URL) key
    fn get_page(&self, tenant: &str, url: &str) -> StorageResult<Option<PageRecord>>;

    /// Returns all of a tenant's pages in insertion order, optionally
    /// filtered by status
    ///
    /// Insertion order is the stable iteration order search ties rely on.
    fn list_pages(
        &self,
        tenant: &str,
        status: Option<PageStatus>,
    ) -> StorageResult<Vec<PageRecord>>;

    /// Returns a tenant's most recently inserted pages, newest first
    fn recent_pages(&self, tenant: &str, limit: u32) -> StorageResult<Vec<PageRecord>>;

    /// Counts all pages stored for a tenant
    fn count_pages(&self, tenant: &str) -> StorageResult<u64>;

    /// Removes every page for the tenant; returns the count deleted
    fn delete_all_pages(&mut self, tenant: &str) -> StorageResult<u64>;

    // ===== Crawl Settings =====

    /// Reads a tenant's crawl settings; absent settings read as the defaults
    fn get_crawl_settings(&self, tenant: &str) -> StorageResult<CrawlSettings>;

    /// Read-modify-write merge of the patch over the stored settings
    fn update_crawl_settings(&mut self, tenant: &str, patch: &SettingsPatch)
        -> StorageResult<()>;

    /// Attempts the `-> in_progress` transition
    ///
    /// A single compare-and-set: returns false (and changes nothing) when a
    /// crawl is already in progress for this tenant.
    fn try_begin_crawl(&mut self, tenant: &str) -> StorageResult<bool>;

    /// Records a crawl's terminal status
    ///
    /// Sets `status`, `total_pages_indexed`, `last_crawl_at = now`, and
    /// `last_error`.
    fn finish_crawl(
        &mut self,
        tenant: &str,
        status: CrawlStatus,
        total_pages: u32,
        error: Option<&str>,
    ) -> StorageResult<()>;

    /// Resets the state machine after an explicit clear
    ///
    /// Status returns to idle, `total_pages_indexed` to zero, and the last
    /// crawl timestamp/error are dropped.
    fn reset_after_clear(&mut self, tenant: &str) -> StorageResult<()>;
}
