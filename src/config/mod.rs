//! Configuration module for SiteIndex
//!
//! This module handles loading, parsing, and validating the TOML runtime
//! configuration (database path, user agent, timeouts). Per-tenant crawl
//! settings are not configured here; they live in the page store.
//!
//! # Example
//!
//! ```no_run
//! use siteindex::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Database at: {}", config.index.database_path);
//! ```

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{Config, CrawlerConfig, IndexConfig};
