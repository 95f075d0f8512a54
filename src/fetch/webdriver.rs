use crate::errors::FetchError;
use crate::fetch::Fetcher;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use tokio::sync::Mutex;

/// Local addresses tried when the configured WebDriver URL is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444",
];

/// Fetches pages through a real browser driven over WebDriver.
///
/// The session is opened on first use. A session holds a single tab, so
/// fetches through one `WebDriverFetcher` are serialized.
pub struct WebDriverFetcher {
    webdriver_url: String,
    client: Mutex<Option<Client>>,
}

impl WebDriverFetcher {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            client: Mutex::new(None),
        }
    }

    /// Ends the browser session, if one was opened
    pub async fn close(&self) {
        if let Some(client) = self.client.lock().await.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", e);
            }
        }
    }

    async fn connect(&self) -> Result<Client, FetchError> {
        match ClientBuilder::native().connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(client);
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
            }
        }

        for url in FALLBACK_WEBDRIVER_URLS.iter() {
            if *url == self.webdriver_url {
                continue;
            }
            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = ClientBuilder::native().connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
        }

        Err(FetchError::WebDriver(format!(
            "no WebDriver server reachable at {} or local fallbacks; set WEBDRIVER_URL",
            self.webdriver_url
        )))
    }

    async fn load(client: &Client, url: &str) -> Result<String, fantoccini::error::CmdError> {
        client.goto(url).await?;
        client.source().await
    }
}

#[async_trait]
impl Fetcher for WebDriverFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut guard = self.client.lock().await;

        let client = match guard.as_ref() {
            Some(client) => client.clone(),
            None => {
                let client = self.connect().await?;
                *guard = Some(client.clone());
                client
            }
        };

        ::log::debug!("SCRAPE: {}", url);
        match Self::load(&client, url).await {
            Ok(source) => Ok(source),
            Err(e) if e.to_string().contains("Unable to find session") => {
                // One reconnect, then give up on this page
                ::log::warn!("Lost WebDriver session while loading {}, reconnecting", url);
                let fresh = self.connect().await?;
                *guard = Some(fresh.clone());
                Self::load(&fresh, url)
                    .await
                    .map_err(|e| FetchError::Session(e.to_string()))
            }
            Err(e) => Err(FetchError::Session(e.to_string())),
        }
    }
}
