//! Status enums shared by the orchestrator, store, and dashboard reads

mod crawl_status;
mod page_status;

pub use crawl_status::CrawlStatus;
pub use page_status::PageStatus;
