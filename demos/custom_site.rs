use clap::Parser;
use recipe_crawl::config::CrawlerConfig;
use recipe_crawl::{CrawlObserver, Fetcher, HttpFetcher, RecipeIndex};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to crawler configuration file defining one or more sites
    #[arg(short, long)]
    config: PathBuf,

    /// Name of the site to crawl
    #[arg(short, long)]
    site: String,

    /// Override max concurrency
    #[arg(short = 'n', long)]
    concurrency: Option<usize>,
}

/// Counts visited pages and prints a dot for each
#[derive(Default)]
struct Progress {
    pages: AtomicUsize,
}

impl CrawlObserver for Progress {
    fn category_visited(&self, _url: &str) {
        self.pages.fetch_add(1, Ordering::Relaxed);
        eprint!(".");
    }

    fn listing_page_visited(&self, _partition: Option<&str>, _page: u32, _url: &str) {
        self.pages.fetch_add(1, Ordering::Relaxed);
        eprint!(".");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    let args = Args::parse();

    let mut config = CrawlerConfig::from_file(&args.config)?;
    config.apply_env();
    if let Some(concurrency) = args.concurrency {
        config.max_concurrency = concurrency.max(1);
    }

    println!("Loaded {} site definitions", config.sites.len());
    for site in &config.sites {
        println!("  {} ({})", site.name, site.base_url);
    }

    let progress = Arc::new(Progress::default());
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config.fetch)?);
    let summary = RecipeIndex::from_target(&args.site, &config)?
        .with_observer(progress.clone())
        .collect(fetcher)
        .await?;

    eprintln!();
    println!(
        "{}: {} recipe URLs after visiting {} listing pages",
        summary.site,
        summary.len(),
        progress.pages.load(Ordering::Relaxed)
    );
    for url in summary.urls.iter().take(20) {
        println!("  {}", url);
    }

    Ok(())
}
