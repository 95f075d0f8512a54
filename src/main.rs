use clap::Parser;
use recipe_crawl::config::{CrawlerConfig, FetchBackend};
use recipe_crawl::{
    CrawlError, CrawlSummary, Fetcher, HttpFetcher, RecipeIndex, Site, SiteConfig, WebDriverFetcher,
};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    if args.list_sites {
        list_sites(&args);
        return;
    }

    if let Err(e) = run(args).await {
        ::log::error!("Crawl failed: {}", e);
        std::process::exit(1);
    }
}

fn list_sites(args: &Args) {
    let custom = custom_sites(args.config.as_deref());

    for site in Site::ALL {
        println!("{}\t{}", site.name(), site.config().base_url);
    }
    for site in custom {
        println!("{}\t{}", site.name, site.base_url);
    }
}

/// Sites defined in the config file. A file that fails to load is logged and
/// contributes nothing.
fn custom_sites(path: Option<&Path>) -> Vec<SiteConfig> {
    let Some(path) = path else {
        return Vec::new();
    };
    match CrawlerConfig::from_file(path) {
        Ok(config) => config.sites,
        Err(e) => {
            ::log::error!("Ignoring custom sites, failed to load {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn load_config(args: &Args) -> Result<CrawlerConfig, CrawlError> {
    let mut config = match &args.config {
        Some(path) => CrawlerConfig::from_file(path)?,
        None => CrawlerConfig::default(),
    };
    config.apply_env();

    if args.webdriver {
        config.fetch.backend = FetchBackend::WebDriver;
    }
    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 {
            return Err(CrawlError::Config("--concurrency must be at least 1".to_string()));
        }
        config.max_concurrency = concurrency;
    }
    if let Some(total_timeout) = args.total_timeout {
        config.total_timeout_secs = Some(total_timeout);
    }
    Ok(config)
}

async fn run(args: Args) -> Result<(), CrawlError> {
    let config = load_config(&args)?;
    let target = args.target.as_deref().unwrap_or_default();

    ::log::info!("Starting recipe URL discovery for: {}", target);

    let cancel = CancellationToken::new();
    let index = RecipeIndex::from_target(target, &config)?.with_cancellation(cancel.clone());

    // Ctrl-C stops the crawl before its next fetch
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ::log::warn!("Interrupted, cancelling crawl");
            on_signal.cancel();
        }
    });

    let summary = match config.fetch.backend {
        FetchBackend::Http => {
            let fetcher: Arc<dyn Fetcher> = Arc::new(
                HttpFetcher::new(&config.fetch)
                    .map_err(|e| CrawlError::Config(format!("cannot build HTTP client: {}", e)))?,
            );
            index.collect(fetcher).await?
        }
        FetchBackend::WebDriver => {
            eprintln!("Note: WebDriver fetching requires a WebDriver server (e.g., ChromeDriver).");
            eprintln!(
                "Set WEBDRIVER_URL environment variable if not using {}",
                config.fetch.webdriver_url
            );
            let fetcher = Arc::new(WebDriverFetcher::new(config.fetch.webdriver_url.clone()));
            let result = index.collect(fetcher.clone()).await;
            fetcher.close().await;
            result?
        }
    };

    print_summary(&summary, args.json)
}

fn print_summary(summary: &CrawlSummary, json: bool) -> Result<(), CrawlError> {
    if json {
        let out = serde_json::to_string_pretty(summary)
            .map_err(|e| CrawlError::Config(e.to_string()))?;
        println!("{}", out);
    } else {
        for url in &summary.urls {
            println!("{}", url);
        }
    }
    ::log::info!(
        "Found {} recipe URLs on {} ({} pages fetched)",
        summary.len(),
        summary.site,
        summary.pages_fetched
    );
    Ok(())
}
