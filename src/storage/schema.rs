//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the SiteIndex
//! database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Per-tenant crawl settings and state machine
CREATE TABLE IF NOT EXISTS crawl_settings (
    tenant TEXT PRIMARY KEY,
    domain TEXT,
    enable_full_crawl INTEGER NOT NULL DEFAULT 0,
    max_pages INTEGER NOT NULL DEFAULT 100,
    max_depth INTEGER NOT NULL DEFAULT 3,
    exclude_patterns TEXT NOT NULL DEFAULT '[]',
    status TEXT NOT NULL DEFAULT 'idle',
    last_crawl_at TEXT,
    last_error TEXT,
    total_pages_indexed INTEGER
);

-- One record per (tenant, canonical URL)
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant TEXT NOT NULL,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    text_content TEXT NOT NULL,
    html_snippet TEXT NOT NULL,
    description TEXT,
    keywords TEXT,
    headings TEXT NOT NULL DEFAULT '[]',
    depth INTEGER NOT NULL,
    status TEXT NOT NULL,
    last_crawled_at TEXT NOT NULL,
    parent_url TEXT,
    error TEXT,
    UNIQUE(tenant, url)
);

CREATE INDEX IF NOT EXISTS idx_pages_tenant ON pages(tenant);
CREATE INDEX IF NOT EXISTS idx_pages_tenant_status ON pages(tenant, status);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
