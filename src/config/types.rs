use serde::Deserialize;

/// Main configuration structure for SiteIndex
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index: IndexConfig::default(),
            crawler: CrawlerConfig::default(),
        }
    }
}

/// Index storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            database_path: "./siteindex.db".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// User agent sent with every page fetch
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Delay between frontier dequeues in milliseconds
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: "SiteIndex-Crawler/1.0".to_string(),
            fetch_timeout_secs: 10,
            request_delay_ms: 500,
        }
    }
}
