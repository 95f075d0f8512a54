pub mod category;
pub mod crawler;
pub mod paginated;

pub use category::CategoryTreeCrawler;
pub use crawler::{CrawlContext, CrawlObserver, Crawler, LogObserver, NoopObserver, RecipeUrlSet};
pub use paginated::PaginatedListCrawler;

#[cfg(test)]
pub(crate) mod tests;
