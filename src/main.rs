//! SiteIndex main entry point
//!
//! This is the command-line interface for the SiteIndex tenant site crawler
//! and content index.

use anyhow::Context;
use clap::{Parser, Subcommand};
use siteindex::config::load_config;
use siteindex::service::SiteIndexService;
use siteindex::storage::SettingsPatch;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SiteIndex: a per-tenant site crawler and content index
///
/// Crawls one tenant's domain breadth-first within configured budgets,
/// stores one durable record per page, and answers relevance searches over
/// the indexed content.
#[derive(Parser, Debug)]
#[command(name = "siteindex")]
#[command(version = "0.1.0")]
#[command(about = "Tenant site crawler and content index", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set the domain a tenant's crawls are confined to
    SetDomain {
        /// Tenant identifier
        #[arg(long)]
        tenant: String,

        /// Domain or start URL, e.g. "example.com"
        domain: String,
    },

    /// Update a tenant's crawl settings
    Configure {
        /// Tenant identifier
        #[arg(long)]
        tenant: String,

        /// Enable or disable full crawls
        #[arg(long)]
        enable_full_crawl: Option<bool>,

        /// Maximum pages stored per crawl
        #[arg(long)]
        max_pages: Option<u32>,

        /// Maximum link depth from the start URL
        #[arg(long)]
        max_depth: Option<u32>,

        /// Glob patterns for URLs to skip (repeatable)
        #[arg(long = "exclude")]
        exclude_patterns: Vec<String>,
    },

    /// Run a full crawl for a tenant
    Crawl {
        /// Tenant identifier
        #[arg(long)]
        tenant: String,
    },

    /// Show a tenant's crawl status and page count
    Status {
        /// Tenant identifier
        #[arg(long)]
        tenant: String,
    },

    /// Search a tenant's indexed pages
    Search {
        /// Tenant identifier
        #[arg(long)]
        tenant: String,

        /// Search query
        query: String,

        /// Maximum number of hits
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List a tenant's most recently indexed pages
    Pages {
        /// Tenant identifier
        #[arg(long)]
        tenant: String,

        /// Maximum number of pages to list
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Delete a tenant's indexed pages and reset its crawl state
    Clear {
        /// Tenant identifier
        #[arg(long)]
        tenant: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    let service = SiteIndexService::new(config)?;

    match cli.command {
        Command::SetDomain { tenant, domain } => {
            let settings = service.update_settings(
                &tenant,
                &SettingsPatch {
                    domain: Some(domain),
                    ..Default::default()
                },
            )?;
            println!(
                "Domain for tenant '{}' set to: {}",
                tenant,
                settings.domain.as_deref().unwrap_or("-")
            );
        }

        Command::Configure {
            tenant,
            enable_full_crawl,
            max_pages,
            max_depth,
            exclude_patterns,
        } => {
            let patch = SettingsPatch {
                domain: None,
                enable_full_crawl,
                max_pages,
                max_depth,
                exclude_patterns: if exclude_patterns.is_empty() {
                    None
                } else {
                    Some(exclude_patterns)
                },
            };
            let settings = service.update_settings(&tenant, &patch)?;
            println!("Settings for tenant '{}':", tenant);
            println!("  Domain: {}", settings.domain.as_deref().unwrap_or("-"));
            println!("  Full crawl enabled: {}", settings.enable_full_crawl);
            println!("  Max pages: {}", settings.max_pages);
            println!("  Max depth: {}", settings.max_depth);
            println!("  Exclude patterns: {:?}", settings.exclude_patterns);
        }

        Command::Crawl { tenant } => match service.start_crawl(&tenant).await {
            Ok(outcome) if outcome.success => {
                println!(
                    "{}",
                    outcome
                        .message
                        .unwrap_or_else(|| "Crawl completed".to_string())
                );
            }
            Ok(outcome) => {
                println!(
                    "Crawl failed after {} pages: {}",
                    outcome.total_pages,
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
                std::process::exit(1);
            }
            Err(e) => {
                tracing::error!("Crawl failed: {}", e);
                return Err(e.into());
            }
        },

        Command::Status { tenant } => {
            let report = service.crawl_status(&tenant)?;
            println!("Status for tenant '{}':", tenant);
            println!("  Status: {}", report.status);
            println!("  Pages indexed: {}", report.total_pages_indexed);
            println!(
                "  Last crawl: {}",
                report.last_crawl_at.as_deref().unwrap_or("never")
            );
            if let Some(error) = &report.last_error {
                println!("  Last error: {}", error);
            }
        }

        Command::Search {
            tenant,
            query,
            limit,
        } => {
            let hits = service.search_indexed_pages(&tenant, &query, limit)?;
            if hits.is_empty() {
                println!("No results for '{}'", query);
            } else {
                for (i, hit) in hits.iter().enumerate() {
                    println!(
                        "{}. {} (score {})\n   {}",
                        i + 1,
                        hit.title,
                        hit.relevance_score,
                        hit.url
                    );
                }
            }
        }

        Command::Pages { tenant, limit } => {
            let pages = service.recent_pages(&tenant, limit)?;
            if pages.is_empty() {
                println!("No pages indexed for tenant '{}'", tenant);
            } else {
                for page in &pages {
                    println!(
                        "[{}] depth {} {} - {} ({})",
                        page.status, page.depth, page.url, page.title, page.last_crawled_at
                    );
                    if let Some(error) = &page.error {
                        println!("      error: {}", error);
                    }
                }
            }
        }

        Command::Clear { tenant } => {
            let deleted = service.clear_indexed_pages(&tenant)?;
            println!("Deleted {} pages for tenant '{}'", deleted, tenant);
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("siteindex=info,warn"),
            1 => EnvFilter::new("siteindex=debug,info"),
            2 => EnvFilter::new("siteindex=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
