use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "recipe-crawl")]
#[command(about = "Discovers every recipe URL of a supported recipe site")]
#[command(version)]
pub struct Args {
    /// Site name (allrecipes, foodandwine, foodnetwork, budgetbytes) or any URL on the site
    #[arg(required_unless_present = "list_sites")]
    pub target: Option<String>,

    /// Path to a JSON crawler configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fetch pages through a WebDriver browser instead of plain HTTP
    #[arg(long)]
    pub webdriver: bool,

    /// Maximum number of fetches in flight
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Total timeout in seconds (maximum runtime)
    #[arg(long)]
    pub total_timeout: Option<u64>,

    /// Print the result as JSON instead of one URL per line
    #[arg(long)]
    pub json: bool,

    /// List known sites and exit
    #[arg(long)]
    pub list_sites: bool,
}
