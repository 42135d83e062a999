//! SiteIndex: a tenant site crawler and content index
//!
//! This crate crawls the pages reachable from a tenant's domain with a
//! bounded breadth-first traversal, extracts structured content, stores one
//! durable record per canonical URL, and serves relevance-ranked lookups
//! that feed an AI answer-generation pipeline.

pub mod config;
pub mod crawler;
pub mod search;
pub mod service;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for SiteIndex operations
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A crawl was rejected before the state machine transitioned.
    #[error("{0}")]
    Precondition(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for SiteIndex operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{CrawlStatus, PageStatus};
pub use url::{extract_domain, matches_exclude, normalize_url};
