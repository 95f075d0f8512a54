pub mod http;
pub mod webdriver;

pub use http::HttpFetcher;
pub use webdriver::WebDriverFetcher;

use crate::errors::FetchError;
use async_trait::async_trait;

/// Retrieves the raw content of a page.
///
/// Retries, timeouts and proxies are the implementation's business; the
/// crawlers treat any error as fatal.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

