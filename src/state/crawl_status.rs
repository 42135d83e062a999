use std::fmt;

/// Status of a tenant's crawl state machine
///
/// Transitions are `idle -> in_progress -> {completed | error}`; `idle` is
/// re-entered only by an explicit clear of the tenant's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlStatus {
    /// No crawl has run since the last clear
    Idle,

    /// A crawl is currently executing its frontier loop
    InProgress,

    /// The last crawl ran to frontier exhaustion or budget
    Completed,

    /// The last crawl aborted mid-loop; partial results are retained
    Error,
}

impl CrawlStatus {
    /// Returns true if a new crawl may begin from this status
    pub fn can_begin_crawl(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(Self::Idle),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
