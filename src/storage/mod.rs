//! Storage module for the tenant page index
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Idempotent page upserts keyed by (tenant, canonical URL)
//! - Per-tenant crawl settings with defaults and status transitions
//! - Tenant-scoped listing, counting, and clearing

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::state::{CrawlStatus, PageStatus};
use crate::IndexError;
use std::path::Path;

/// Default page budget for tenants with no stored settings
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Default depth bound for tenants with no stored settings
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> Result<SqliteStorage, IndexError> {
    SqliteStorage::new(path)
}

/// One durable record per (tenant, canonical URL)
///
/// Overwritten in place on re-visit; content, depth, and status always
/// reflect the most recent crawl.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: i64,
    pub tenant: String,
    pub url: String,
    pub title: String,
    pub text_content: String,
    pub html_snippet: String,
    pub description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub headings: Vec<String>,
    pub depth: u32,
    pub status: PageStatus,
    pub last_crawled_at: String,
    pub parent_url: Option<String>,
    pub error: Option<String>,
}

/// Fields written by a page upsert; identity and timestamp are assigned by
/// the store
#[derive(Debug, Clone)]
pub struct NewPage {
    pub tenant: String,
    pub url: String,
    pub title: String,
    pub text_content: String,
    pub html_snippet: String,
    pub description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub headings: Vec<String>,
    pub depth: u32,
    pub status: PageStatus,
    pub parent_url: Option<String>,
    pub error: Option<String>,
}

/// Per-tenant crawl configuration and state-machine status
///
/// Owned by the store; mutated only through the orchestrator's transitions
/// and the explicit settings patch operation.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub domain: Option<String>,
    pub enable_full_crawl: bool,
    pub max_pages: u32,
    pub max_depth: u32,
    pub exclude_patterns: Vec<String>,
    pub status: CrawlStatus,
    pub last_crawl_at: Option<String>,
    pub last_error: Option<String>,
    pub total_pages_indexed: Option<u32>,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            domain: None,
            enable_full_crawl: false,
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
            exclude_patterns: Vec::new(),
            status: CrawlStatus::Idle,
            last_crawl_at: None,
            last_error: None,
            total_pages_indexed: None,
        }
    }
}

/// Partial update over the settable CrawlSettings fields
///
/// `None` fields are left unchanged by `update_crawl_settings`.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub domain: Option<String>,
    pub enable_full_crawl: Option<bool>,
    pub max_pages: Option<u32>,
    pub max_depth: Option<u32>,
    pub exclude_patterns: Option<Vec<String>>,
}
