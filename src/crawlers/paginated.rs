use crate::classifier::LinkClassifier;
use crate::crawlers::crawler::{CrawlContext, Crawler, RecipeUrlSet};
use crate::errors::CrawlError;
use crate::parsers::html;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use tokio::task::JoinSet;

const PAGE_PLACEHOLDER: &str = "{page}";
const PARTITION_PLACEHOLDER: &str = "{partition}";

/// Sequential walk over numbered listing pages.
///
/// The next page is never guessed: it is followed only when the current page
/// links to `current + 1`. Each partition (for example an alphabetical
/// bucket) restarts at page 1; all partitions feed one result set.
#[derive(Debug, Clone)]
pub struct PaginatedListCrawler {
    url_template: String,
    partitions: Vec<String>,
    page_pattern: Regex,
    classifier: LinkClassifier,
    max_concurrency: usize,
}

impl PaginatedListCrawler {
    /// `url_template` must contain `{page}`, and `{partition}` exactly when
    /// `partitions` is non-empty. `page_pattern` should capture the page
    /// number in a group named `page`, otherwise the first group is used.
    pub fn new(
        url_template: impl Into<String>,
        partitions: Vec<String>,
        page_pattern: &str,
        classifier: LinkClassifier,
    ) -> Result<Self, CrawlError> {
        let url_template = url_template.into();
        validate_template(&url_template, !partitions.is_empty())?;

        Ok(Self {
            url_template,
            partitions,
            page_pattern: Regex::new(page_pattern)?,
            classifier,
            max_concurrency: 1,
        })
    }

    /// Allow up to `max_concurrency` partitions to be crawled at once
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn page_url(&self, partition: Option<&str>, page: u32) -> String {
        let url = self
            .url_template
            .replace(PAGE_PLACEHOLDER, &page.to_string());
        match partition {
            Some(partition) => url.replace(PARTITION_PLACEHOLDER, partition),
            None => url,
        }
    }

    /// Page number encoded in a pagination link, if it parses
    pub fn page_number(&self, href: &str) -> Option<u32> {
        let captures = self.page_pattern.captures(href)?;
        let group = captures.name("page").or_else(|| captures.get(1))?;
        group.as_str().parse().ok()
    }

    /// First pagination link, in document order, that points at `current + 1`
    pub fn next_page(&self, current: u32, pagination_links: &[String]) -> Option<u32> {
        let wanted = current.checked_add(1)?;
        pagination_links
            .iter()
            .filter_map(|href| self.page_number(href))
            .find(|page| *page == wanted)
    }

    /// Recipe links of one listing page and the page to visit next
    pub fn process_page(&self, current: u32, content: &str) -> (Vec<String>, Option<u32>) {
        let partition = self.classifier.partition(&html::extract_links(content));
        let next = self.next_page(current, &partition.follow);
        (partition.recipes, next)
    }

    async fn crawl_partition(
        &self,
        ctx: &CrawlContext,
        partition: Option<&str>,
        recipes: &mut RecipeUrlSet,
    ) -> Result<(), CrawlError> {
        let mut cursor = Some(1);

        while let Some(page) = cursor {
            let url = self.page_url(partition, page);
            ctx.observer().listing_page_visited(partition, page, &url);

            let content = ctx.fetch(&url).await?;
            let (found, next) = self.process_page(page, &content);
            ::log::debug!("{} recipe links on {}", found.len(), url);
            recipes.extend(found);

            if next.is_none() {
                ::log::debug!("No link to page {} on {}, partition done", page.saturating_add(1), url);
            }
            cursor = next;
        }

        Ok(())
    }

    fn partition_keys(&self) -> Vec<Option<String>> {
        if self.partitions.is_empty() {
            vec![None]
        } else {
            self.partitions.iter().cloned().map(Some).collect()
        }
    }

    async fn crawl_sequential(&self, ctx: &CrawlContext) -> Result<RecipeUrlSet, CrawlError> {
        let mut recipes = RecipeUrlSet::new();
        for partition in self.partition_keys() {
            self.crawl_partition(ctx, partition.as_deref(), &mut recipes)
                .await?;
        }
        Ok(recipes)
    }

    /// Partitions share nothing but the result, so each task keeps its own
    /// set and the sets are merged as tasks finish.
    async fn crawl_concurrent(&self, ctx: &CrawlContext) -> Result<RecipeUrlSet, CrawlError> {
        let crawler = Arc::new(self.clone());
        let mut pending = self.partition_keys().into_iter();
        let mut tasks: JoinSet<Result<RecipeUrlSet, CrawlError>> = JoinSet::new();
        let mut recipes = RecipeUrlSet::new();

        loop {
            while tasks.len() < self.max_concurrency {
                let Some(partition) = pending.next() else { break };
                let crawler = Arc::clone(&crawler);
                let ctx = ctx.clone();
                tasks.spawn(async move {
                    let mut local = RecipeUrlSet::new();
                    crawler
                        .crawl_partition(&ctx, partition.as_deref(), &mut local)
                        .await?;
                    Ok(local)
                });
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };
            recipes.extend(joined.map_err(|e| CrawlError::Task(e.to_string()))??);
        }

        Ok(recipes)
    }
}

fn validate_template(template: &str, partitioned: bool) -> Result<(), CrawlError> {
    if !template.contains(PAGE_PLACEHOLDER) {
        return Err(CrawlError::InvalidTemplate(format!(
            "{} has no {} placeholder",
            template, PAGE_PLACEHOLDER
        )));
    }
    if partitioned != template.contains(PARTITION_PLACEHOLDER) {
        return Err(CrawlError::InvalidTemplate(format!(
            "{} placeholder in {} does not match partition list",
            PARTITION_PLACEHOLDER, template
        )));
    }
    Ok(())
}

#[async_trait]
impl Crawler for PaginatedListCrawler {
    async fn crawl(&self, ctx: &CrawlContext) -> Result<RecipeUrlSet, CrawlError> {
        ::log::info!(
            "Starting paginated crawl of {} ({} partitions)",
            self.url_template,
            self.partitions.len().max(1)
        );
        if self.max_concurrency > 1 && self.partitions.len() > 1 {
            self.crawl_concurrent(ctx).await
        } else {
            self.crawl_sequential(ctx).await
        }
    }
}
