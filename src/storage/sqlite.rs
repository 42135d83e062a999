//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::state::{CrawlStatus, PageStatus};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::{CrawlSettings, NewPage, PageRecord, SettingsPatch};
use crate::IndexError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> Result<Self, IndexError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, IndexError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Makes sure a settings row exists so status transitions have a target
    fn ensure_settings_row(&self, tenant: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO crawl_settings (tenant) VALUES (?1)",
            params![tenant],
        )?;
        Ok(())
    }

    fn row_to_page(row: &Row<'_>) -> rusqlite::Result<PageRecord> {
        let keywords_json: Option<String> = row.get(7)?;
        let headings_json: String = row.get(8)?;
        let status_str: String = row.get(10)?;

        Ok(PageRecord {
            id: row.get(0)?,
            tenant: row.get(1)?,
            url: row.get(2)?,
            title: row.get(3)?,
            text_content: row.get(4)?,
            html_snippet: row.get(5)?,
            description: row.get(6)?,
            // Lenient decoding: a corrupt list column reads as empty
            keywords: keywords_json.map(|s| serde_json::from_str(&s).unwrap_or_default()),
            headings: serde_json::from_str(&headings_json).unwrap_or_default(),
            depth: row.get(9)?,
            status: PageStatus::from_db_string(&status_str).unwrap_or(PageStatus::Error),
            last_crawled_at: row.get(11)?,
            parent_url: row.get(12)?,
            error: row.get(13)?,
        })
    }
}

const PAGE_COLUMNS: &str = "id, tenant, url, title, text_content, html_snippet, description,
     keywords, headings, depth, status, last_crawled_at, parent_url, error";

impl Storage for SqliteStorage {
    // ===== Page Management =====

    fn upsert_page(&mut self, page: &NewPage) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let keywords_json = page
            .keywords
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let headings_json = serde_json::to_string(&page.headings)?;

        self.conn.execute(
            "INSERT INTO pages (tenant, url, title, text_content, html_snippet, description,
                 keywords, headings, depth, status, last_crawled_at, parent_url, error)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(tenant, url) DO UPDATE SET
                 title = excluded.title,
                 text_content = excluded.text_content,
                 html_snippet = excluded.html_snippet,
                 description = excluded.description,
                 keywords = excluded.keywords,
                 headings = excluded.headings,
                 depth = excluded.depth,
                 status = excluded.status,
                 last_crawled_at = excluded.last_crawled_at,
                 parent_url = excluded.parent_url,
                 error = excluded.error",
            params![
                page.tenant,
                page.url,
                page.title,
                page.text_content,
                page.html_snippet,
                page.description,
                keywords_json,
                headings_json,
                page.depth,
                page.status.to_db_string(),
                now,
                page.parent_url,
                page.error,
            ],
        )?;

        let id: i64 = self.conn.query_row(
            "SELECT id FROM pages WHERE tenant = ?1 AND url = ?2",
            params![page.tenant, page.url],
            |row| row.get(0),
        )?;

        Ok(id)
    }

    fn get_page(&self, tenant: &str, url: &str) -> StorageResult<Option<PageRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM pages WHERE tenant = ?1 AND url = ?2",
            PAGE_COLUMNS
        ))?;

        let page = stmt
            .query_row(params![tenant, url], Self::row_to_page)
            .optional()?;

        Ok(page)
    }

    fn list_pages(
        &self,
        tenant: &str,
        status: Option<PageStatus>,
    ) -> StorageResult<Vec<PageRecord>> {
        let pages = match status {
            Some(status) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {} FROM pages WHERE tenant = ?1 AND status = ?2 ORDER BY id",
                    PAGE_COLUMNS
                ))?;
                let rows = stmt.query_map(
                    params![tenant, status.to_db_string()],
                    Self::row_to_page,
                )?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {} FROM pages WHERE tenant = ?1 ORDER BY id",
                    PAGE_COLUMNS
                ))?;
                let rows = stmt.query_map(params![tenant], Self::row_to_page)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(pages)
    }

    fn recent_pages(&self, tenant: &str, limit: u32) -> StorageResult<Vec<PageRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM pages WHERE tenant = ?1 ORDER BY id DESC LIMIT ?2",
            PAGE_COLUMNS
        ))?;

        let rows = stmt.query_map(params![tenant, limit], Self::row_to_page)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn count_pages(&self, tenant: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pages WHERE tenant = ?1",
            params![tenant],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn delete_all_pages(&mut self, tenant: &str) -> StorageResult<u64> {
        let deleted = self
            .conn
            .execute("DELETE FROM pages WHERE tenant = ?1", params![tenant])?;
        Ok(deleted as u64)
    }

    // ===== Crawl Settings =====

    fn get_crawl_settings(&self, tenant: &str) -> StorageResult<CrawlSettings> {
        let mut stmt = self.conn.prepare(
            "SELECT domain, enable_full_crawl, max_pages, max_depth, exclude_patterns,
                 status, last_crawl_at, last_error, total_pages_indexed
             FROM crawl_settings WHERE tenant = ?1",
        )?;

        let settings = stmt
            .query_row(params![tenant], |row| {
                let patterns_json: String = row.get(4)?;
                let status_str: String = row.get(5)?;
                Ok(CrawlSettings {
                    domain: row.get(0)?,
                    enable_full_crawl: row.get::<_, i64>(1)? != 0,
                    max_pages: row.get(2)?,
                    max_depth: row.get(3)?,
                    exclude_patterns: serde_json::from_str(&patterns_json).unwrap_or_default(),
                    status: CrawlStatus::from_db_string(&status_str).unwrap_or(CrawlStatus::Idle),
                    last_crawl_at: row.get(6)?,
                    last_error: row.get(7)?,
                    total_pages_indexed: row.get(8)?,
                })
            })
            .optional()?;

        Ok(settings.unwrap_or_default())
    }

    fn update_crawl_settings(
        &mut self,
        tenant: &str,
        patch: &SettingsPatch,
    ) -> StorageResult<()> {
        self.ensure_settings_row(tenant)?;
        let current = self.get_crawl_settings(tenant)?;

        let domain = patch.domain.clone().or(current.domain);
        let enable = patch.enable_full_crawl.unwrap_or(current.enable_full_crawl);
        let max_pages = patch.max_pages.unwrap_or(current.max_pages).max(1);
        let max_depth = patch.max_depth.unwrap_or(current.max_depth);
        let patterns = patch
            .exclude_patterns
            .clone()
            .unwrap_or(current.exclude_patterns);
        let patterns_json = serde_json::to_string(&patterns)?;

        self.conn.execute(
            "UPDATE crawl_settings
             SET domain = ?1, enable_full_crawl = ?2, max_pages = ?3, max_depth = ?4,
                 exclude_patterns = ?5
             WHERE tenant = ?6",
            params![
                domain,
                enable as i64,
                max_pages,
                max_depth,
                patterns_json,
                tenant
            ],
        )?;

        Ok(())
    }

    fn try_begin_crawl(&mut self, tenant: &str) -> StorageResult<bool> {
        self.ensure_settings_row(tenant)?;

        // Single-statement compare-and-set: losing the race changes nothing.
        let changed = self.conn.execute(
            "UPDATE crawl_settings SET status = ?1
             WHERE tenant = ?2 AND status != ?1",
            params![CrawlStatus::InProgress.to_db_string(), tenant],
        )?;

        Ok(changed > 0)
    }

    fn finish_crawl(
        &mut self,
        tenant: &str,
        status: CrawlStatus,
        total_pages: u32,
        error: Option<&str>,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE crawl_settings
             SET status = ?1, total_pages_indexed = ?2, last_crawl_at = ?3, last_error = ?4
             WHERE tenant = ?5",
            params![status.to_db_string(), total_pages, now, error, tenant],
        )?;
        Ok(())
    }

    fn reset_after_clear(&mut self, tenant: &str) -> StorageResult<()> {
        self.ensure_settings_row(tenant)?;
        self.conn.execute(
            "UPDATE crawl_settings
             SET status = ?1, total_pages_indexed = 0, last_crawl_at = NULL, last_error = NULL
             WHERE tenant = ?2",
            params![CrawlStatus::Idle.to_db_string(), tenant],
        )?;
        Ok(())
    }
}
