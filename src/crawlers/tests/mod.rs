//! In-memory fixture sites shared by the crawler tests


use crate::crawlers::crawler::CrawlObserver;
use crate::errors::FetchError;
use crate::fetch::Fetcher;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves pages from a map and records every request
#[derive(Default)]
pub(crate) struct FixtureSite {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FixtureSite {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn fetch_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| *r == url).count()
    }
}

#[async_trait]
impl Fetcher for FixtureSite {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
    }
}

/// Records observer callbacks in order
#[derive(Default)]
pub(crate) struct RecordingObserver {
    pub(crate) categories: Mutex<Vec<String>>,
    pub(crate) listing_pages: Mutex<Vec<(Option<String>, u32)>>,
}

impl CrawlObserver for RecordingObserver {
    fn category_visited(&self, url: &str) {
        self.categories.lock().unwrap().push(url.to_string());
    }

    fn listing_page_visited(&self, partition: Option<&str>, page: u32, _url: &str) {
        self.listing_pages
            .lock()
            .unwrap()
            .push((partition.map(|p| p.to_string()), page));
    }
}

/// A page of taxonomy links, optionally mixed with recipe cards
pub(crate) fn category_page(categories: &[&str], cards: &[&str]) -> String {
    let mut html = String::from("<html><body><nav>");
    for href in categories {
        html.push_str(&format!(
            r#"<a class="taxonomy-nodes__link" href="{}">cat</a>"#,
            href
        ));
    }
    html.push_str("</nav>");
    html.push_str(&cards_html(cards));
    html.push_str("</body></html>");
    html
}

/// A page of recipe cards plus unrelated site chrome
pub(crate) fn leaf_page(cards: &[&str]) -> String {
    format!(
        r#"<html><body><a href="https://site.test/about">About</a>{}</body></html>"#,
        cards_html(cards)
    )
}

fn cards_html(cards: &[&str]) -> String {
    cards
        .iter()
        .map(|href| {
            format!(
                r#"<a class="comp mntl-card-list-items" href="{}"><img src="x.jpg"></a>"#,
                href
            )
        })
        .collect()
}

/// A listing page linking to the given page numbers and recipes
pub(crate) fn listing_page(partition: &str, page_links: &[u32], recipes: &[&str]) -> String {
    let mut html = String::from("<html><body><ul>");
    for href in recipes {
        html.push_str(&format!(r#"<li><a href="{}">recipe</a></li>"#, href));
    }
    html.push_str("</ul><div class=\"pagination\">");
    for page in page_links {
        html.push_str(&format!(
            r#"<a href="https://site.test/recipes/recipes-a-z/{}/p/{}">{}</a>"#,
            partition, page, page
        ));
    }
    html.push_str("</div></body></html>");
    html
}
