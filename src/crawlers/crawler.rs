use crate::errors::CrawlError;
use crate::fetch::Fetcher;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// Deduplicated recipe URLs, exact string keys
pub type RecipeUrlSet = HashSet<String>;

/// A URL-discovery strategy for one site
#[async_trait]
pub trait Crawler: Send + Sync {
    /// Runs the crawl to completion, or stops at the first fetch failure
    async fn crawl(&self, ctx: &CrawlContext) -> Result<RecipeUrlSet, CrawlError>;
}

/// Receives progress notifications while a crawl runs
pub trait CrawlObserver: Send + Sync {
    /// A category page is about to be fetched for the first time
    fn category_visited(&self, _url: &str) {}

    /// A listing page is about to be fetched
    fn listing_page_visited(&self, _partition: Option<&str>, _page: u32, _url: &str) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {}

/// Observer that reports progress through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl CrawlObserver for LogObserver {
    fn category_visited(&self, url: &str) {
        ::log::info!("Visiting category: {}", url);
    }

    fn listing_page_visited(&self, partition: Option<&str>, page: u32, url: &str) {
        match partition {
            Some(partition) => ::log::info!("Listing {} page {}: {}", partition, page, url),
            None => ::log::info!("Listing page {}: {}", page, url),
        }
    }
}

/// Everything a crawler needs besides its own site rules.
///
/// Cheap to clone; clones share the fetcher, observer, cancellation token
/// and fetch counter.
#[derive(Clone)]
pub struct CrawlContext {
    fetcher: Arc<dyn Fetcher>,
    observer: Arc<dyn CrawlObserver>,
    cancel: CancellationToken,
    pages_fetched: Arc<AtomicUsize>,
}

impl CrawlContext {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            observer: Arc::new(NoopObserver),
            cancel: CancellationToken::new(),
            pages_fetched: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn observer(&self) -> &dyn CrawlObserver {
        self.observer.as_ref()
    }

    /// Number of successful fetches so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched.load(Ordering::Relaxed)
    }

    /// Fetches one page, honouring cancellation before and during the request
    pub async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        if self.cancel.is_cancelled() {
            return Err(CrawlError::Cancelled);
        }

        let content = tokio::select! {
            _ = self.cancel.cancelled() => return Err(CrawlError::Cancelled),
            result = self.fetcher.fetch(url) => result.map_err(|e| CrawlError::fetch(url, e))?,
        };

        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
        Ok(content)
    }
}
