pub mod classifier;
pub mod config;
pub mod crawlers;
pub mod errors;
pub mod fetch;
pub mod parsers;
pub mod patterns;
pub mod results;
pub mod sites;
pub mod utils;

// Re-export commonly used types for convenience
pub use classifier::{LinkClassifier, PageKind};
pub use config::{CrawlerConfig, FetchBackend, FetchConfig};
pub use crawlers::{CategoryTreeCrawler, CrawlContext, CrawlObserver, Crawler, PaginatedListCrawler};
pub use errors::{CrawlError, FetchError};
pub use fetch::{Fetcher, HttpFetcher, WebDriverFetcher};
pub use results::CrawlSummary;
pub use sites::{Site, SiteConfig};

use crawlers::LogObserver;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Main builder for enumerating every recipe URL of one site
pub struct RecipeIndex {
    site: SiteConfig,
    max_concurrency: usize,
    total_timeout: Option<Duration>,
    cancel: CancellationToken,
    observer: Arc<dyn CrawlObserver>,
}

impl RecipeIndex {
    /// Create a new builder for the given site definition
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            max_concurrency: 1,
            total_timeout: None,
            cancel: CancellationToken::new(),
            observer: Arc::new(LogObserver),
        }
    }

    /// Resolve a site name or URL against the built-in and configured sites
    pub fn from_target(target: &str, config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let site = sites::resolve(target, &config.sites)?;
        Ok(Self::new(site).with_config(config))
    }

    /// Apply the crawl-level settings of a configuration
    pub fn with_config(mut self, config: &CrawlerConfig) -> Self {
        self.max_concurrency = config.max_concurrency.max(1);
        self.total_timeout = config.total_timeout_secs.map(Duration::from_secs);
        self
    }

    /// Set the maximum number of fetches in flight
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Abort the crawl if it runs longer than `timeout`
    pub fn with_total_timeout(mut self, timeout: Duration) -> Self {
        self.total_timeout = Some(timeout);
        self
    }

    /// Stop the crawl before its next fetch once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Replace the default logging observer
    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Run the crawl and return absolute, sorted recipe URLs
    pub async fn collect(&self, fetcher: Arc<dyn Fetcher>) -> Result<CrawlSummary, CrawlError> {
        let base = Url::parse(&self.site.base_url)
            .map_err(|e| CrawlError::Config(format!("{}: base_url: {}", self.site.name, e)))?;
        let crawler = self.site.crawler(self.max_concurrency)?;
        let ctx = CrawlContext::new(fetcher)
            .with_observer(Arc::clone(&self.observer))
            .with_cancellation(self.cancel.clone());

        ::log::info!("Collecting recipe URLs for {}", self.site.name);
        let start_time = std::time::Instant::now();

        let found = match self.total_timeout {
            Some(limit) => tokio::time::timeout(limit, crawler.crawl(&ctx))
                .await
                .map_err(|_| CrawlError::Timeout(limit))??,
            None => crawler.crawl(&ctx).await?,
        };

        let urls = utils::absolutize_all(&base, &found);
        ::log::info!(
            "Crawl of {} complete - {} recipe URLs from {} pages in {:.2} seconds",
            self.site.name,
            urls.len(),
            ctx.pages_fetched(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(CrawlSummary::new(
            self.site.name.clone(),
            urls,
            ctx.pages_fetched(),
        ))
    }
}
