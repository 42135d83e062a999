use std::fmt;

/// Terminal status of a stored page record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageStatus {
    /// Page was fetched and its content extracted
    Crawled,

    /// Fetch failed; the record carries the failure message and no content
    Error,
}

impl PageStatus {
    pub fn is_crawled(&self) -> bool {
        matches!(self, Self::Crawled)
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Crawled => "crawled",
            Self::Error => "error",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "crawled" => Some(Self::Crawled),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
