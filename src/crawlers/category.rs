use crate::classifier::{LinkClassifier, PageKind};
use crate::crawlers::crawler::{CrawlContext, Crawler, RecipeUrlSet};
use crate::errors::CrawlError;
use crate::parsers::html;
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use tokio::task::JoinSet;

/// Mutable state of one category-tree crawl
#[derive(Debug, Default)]
pub struct TreeState {
    /// Category URLs already scheduled or fetched, seed included
    pub visited: HashSet<String>,
    pub recipes: RecipeUrlSet,
}

impl TreeState {
    pub fn new(seed_url: &str) -> Self {
        let mut visited = HashSet::new();
        visited.insert(seed_url.to_string());
        Self {
            visited,
            recipes: RecipeUrlSet::new(),
        }
    }
}

/// Depth-first walk over a site's category taxonomy.
///
/// A page with at least one category link is a branch and only its category
/// links are followed. A page without any is a leaf and contributes its
/// recipe links. Each category URL is fetched at most once per crawl.
#[derive(Debug, Clone)]
pub struct CategoryTreeCrawler {
    seed_url: String,
    classifier: LinkClassifier,
    max_concurrency: usize,
}

impl CategoryTreeCrawler {
    pub fn new(seed_url: impl Into<String>, classifier: LinkClassifier) -> Self {
        Self {
            seed_url: seed_url.into(),
            classifier,
            max_concurrency: 1,
        }
    }

    /// Allow up to `max_concurrency` category fetches in flight
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    fn classify(&self, content: &str) -> PageKind {
        self.classifier.classify(&html::extract_links(content))
    }

    /// One fetch at a time, siblings explored in document order.
    ///
    /// The stack of pending sibling queues stands in for the call stack, so
    /// taxonomy depth is not limited by native stack size.
    async fn crawl_sequential(&self, ctx: &CrawlContext) -> Result<RecipeUrlSet, CrawlError> {
        let mut state = TreeState::new(&self.seed_url);
        let mut stack: Vec<VecDeque<String>> = Vec::new();

        let content = ctx.fetch(&self.seed_url).await?;
        absorb(self.classify(&content), &mut state, &mut stack);

        while let Some(pending) = stack.last_mut() {
            let Some(link) = pending.pop_front() else {
                stack.pop();
                continue;
            };

            // Inserted before descending: a second occurrence anywhere is skipped
            if !state.visited.insert(link.clone()) {
                ::log::trace!("Skipping already visited category: {}", link);
                continue;
            }

            ctx.observer().category_visited(&link);
            let content = ctx.fetch(&link).await?;
            absorb(self.classify(&content), &mut state, &mut stack);
        }

        ::log::debug!(
            "Category crawl from {} visited {} categories, found {} recipes",
            self.seed_url,
            state.visited.len(),
            state.recipes.len()
        );
        Ok(state.recipes)
    }

    /// Category fetches run as tasks; this loop alone owns the visited set,
    /// so the check and the insert cannot race.
    async fn crawl_concurrent(&self, ctx: &CrawlContext) -> Result<RecipeUrlSet, CrawlError> {
        let mut state = TreeState::new(&self.seed_url);
        let mut queue = VecDeque::from([self.seed_url.clone()]);
        let mut tasks: JoinSet<Result<PageKind, CrawlError>> = JoinSet::new();

        loop {
            while tasks.len() < self.max_concurrency {
                let Some(url) = queue.pop_front() else { break };
                let ctx = ctx.clone();
                let crawler = self.clone();
                tasks.spawn(async move {
                    let content = ctx.fetch(&url).await?;
                    Ok(crawler.classify(&content))
                });
            }

            // Dropping the set on error aborts the remaining fetches
            let Some(joined) = tasks.join_next().await else {
                break;
            };
            let kind = joined.map_err(|e| CrawlError::Task(e.to_string()))??;

            match kind {
                PageKind::Branch(links) => {
                    for link in links {
                        if state.visited.insert(link.clone()) {
                            ctx.observer().category_visited(&link);
                            queue.push_back(link);
                        }
                    }
                }
                PageKind::Leaf(recipes) => state.recipes.extend(recipes),
            }
        }

        ::log::debug!(
            "Concurrent category crawl from {} visited {} categories, found {} recipes",
            self.seed_url,
            state.visited.len(),
            state.recipes.len()
        );
        Ok(state.recipes)
    }
}

fn absorb(kind: PageKind, state: &mut TreeState, stack: &mut Vec<VecDeque<String>>) {
    match kind {
        PageKind::Branch(links) => stack.push(links.into()),
        PageKind::Leaf(recipes) => state.recipes.extend(recipes),
    }
}

#[async_trait]
impl Crawler for CategoryTreeCrawler {
    async fn crawl(&self, ctx: &CrawlContext) -> Result<RecipeUrlSet, CrawlError> {
        ::log::info!("Starting category crawl from {}", self.seed_url);
        if self.max_concurrency > 1 {
            self.crawl_concurrent(ctx).await
        } else {
            self.crawl_sequential(ctx).await
        }
    }
}
