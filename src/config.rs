use crate::errors::CrawlError;
use crate::sites::SiteConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Which transport retrieves listing pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchBackend {
    /// Plain HTTP requests with browser-like headers
    #[default]
    Http,
    /// A real browser driven over WebDriver
    WebDriver,
}

/// Configuration for page fetching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default)]
    pub backend: FetchBackend,

    /// User-Agent sent by the HTTP backend
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            backend: FetchBackend::default(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            webdriver_url: default_webdriver_url(),
        }
    }
}

/// Top-level crawler configuration, usually loaded from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Maximum number of fetches in flight. 1 keeps the crawl sequential.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Abort the crawl after this many seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_timeout_secs: Option<u64>,

    /// Site definitions in addition to the built-in catalogue
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            max_concurrency: default_max_concurrency(),
            total_timeout_secs: None,
            sites: Vec::new(),
        }
    }
}

impl CrawlerConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CrawlError> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(|e| CrawlError::Config(format!("{}: {}", path.display(), e)))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| CrawlError::Config(format!("{}: {}", path.display(), e)))?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, CrawlError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CrawlError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CrawlError> {
        if self.max_concurrency == 0 {
            return Err(CrawlError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        for site in &self.sites {
            site.validate()?;
        }
        Ok(())
    }

    /// Apply the WEBDRIVER_URL environment override, if set
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.fetch.webdriver_url = webdriver_url;
            }
        }
    }
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    1
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:86.0) Gecko/20100101 Firefox/86.0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CrawlerConfig::from_json("{}").unwrap();
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.total_timeout_secs, None);
        assert_eq!(config.fetch, FetchConfig::default());
        assert!(config.sites.is_empty());
    }

    #[test]
    fn test_default_matches_empty_file() {
        let config = CrawlerConfig::default();
        assert_eq!(config.max_concurrency, 1);
        config.validate().unwrap();

        let parsed = CrawlerConfig::from_json("{}").unwrap();
        assert_eq!(config.max_concurrency, parsed.max_concurrency);
        assert_eq!(config.fetch, parsed.fetch);
    }

    #[test]
    fn test_fetch_section() {
        let json = r#"{
            "fetch": {"backend": "web_driver", "timeout_secs": 5},
            "max_concurrency": 4,
            "total_timeout_secs": 600
        }"#;
        let config = CrawlerConfig::from_json(json).unwrap();
        assert_eq!(config.fetch.backend, FetchBackend::WebDriver);
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.fetch.webdriver_url, "http://localhost:4444");
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.total_timeout_secs, Some(600));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = CrawlerConfig::from_json(r#"{"max_concurrency": 0}"#).unwrap_err();
        assert!(matches!(err, CrawlError::Config(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            CrawlerConfig::from_json("{not json"),
            Err(CrawlError::Config(_))
        ));
    }

    #[test]
    fn test_custom_site_definition() {
        let json = r#"{
            "sites": [{
                "name": "example",
                "base_url": "https://example.test/",
                "strategy": "paginated",
                "url_template": "https://example.test/list/{page}",
                "page_pattern": "/list/(?P<page>[0-9]+)",
                "pagination": {"href_contains": ["/list/"]},
                "recipe": {"href_contains": ["/r/"]}
            }]
        }"#;
        let config = CrawlerConfig::from_json(json).unwrap();
        assert_eq!(config.sites.len(), 1);
        assert_eq!(config.sites[0].name, "example");
    }

    #[test]
    fn test_custom_site_with_bad_template_rejected() {
        let json = r#"{
            "sites": [{
                "name": "broken",
                "base_url": "https://example.test/",
                "strategy": "paginated",
                "url_template": "https://example.test/list",
                "page_pattern": "/list/(?P<page>[0-9]+)",
                "pagination": {},
                "recipe": {}
            }]
        }"#;
        assert!(matches!(
            CrawlerConfig::from_json(json),
            Err(CrawlError::InvalidTemplate(_))
        ));
    }
}
