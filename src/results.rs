use serde::{Deserialize, Serialize};

/// Outcome of a completed crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    /// Name of the crawled site
    pub site: String,

    /// Discovered recipe URLs, absolute and sorted
    pub urls: Vec<String>,

    /// Number of listing or category pages fetched
    pub pages_fetched: usize,
}

impl CrawlSummary {
    pub fn new(site: String, urls: Vec<String>, pages_fetched: usize) -> Self {
        Self {
            site,
            urls,
            pages_fetched,
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
