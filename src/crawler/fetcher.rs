//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests to fetch page bodies
//! - Error classification into collaborator-facing messages

use crate::config::CrawlerConfig;
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
///
/// Failures carry the message that is stored on the page's error record,
/// so the wording here is part of the observable behavior.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched the page body
    Success {
        /// Page body content
        body: String,
    },

    /// Fetch failed; the page is recorded with this message
    Failure {
        /// Error description, e.g. "HTTP 404: Not Found"
        message: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body, classifying every failure into a message
///
/// Non-2xx responses become `"HTTP {code}: {reason}"`. Timeouts and
/// connection failures get fixed messages so re-crawls of a flaky host
/// overwrite the same record text.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchOutcome::Failure {
                message: classify_request_error(&e),
            }
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::Failure {
            message: format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ),
        };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Success { body },
        Err(e) => FetchOutcome::Failure {
            message: classify_request_error(&e),
        },
    }
}

fn classify_request_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}
