use std::time::Duration;
use thiserror::Error;

/// Failure to retrieve a single page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, TLS, timeout)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// Could not reach any WebDriver server
    #[error("webdriver unavailable: {0}")]
    WebDriver(String),

    /// The browser session failed while loading a page
    #[error("browser session error: {0}")]
    Session(String),
}

/// Failure of a whole crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("invalid link pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid listing url template: {0}")]
    InvalidTemplate(String),

    #[error("unknown site: {0}")]
    UnknownSite(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("crawl exceeded total timeout of {0:?}")]
    Timeout(Duration),

    #[error("crawl cancelled")]
    Cancelled,

    #[error("crawl task failed: {0}")]
    Task(String),
}

impl CrawlError {
    pub(crate) fn fetch(url: &str, source: FetchError) -> Self {
        CrawlError::Fetch {
            url: url.to_string(),
            source,
        }
    }
}
