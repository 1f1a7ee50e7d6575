mod models;
mod scrapers;

use anyhow::Context;
use clap::Parser;
use models::ListingRecord;
use scrapers::{ChromeBrowser, CrawlConfig, RealtyLinkScraper, ScraperTrait};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Crawl realtylink.org rentals and save the listings as JSON
#[derive(Parser, Debug)]
#[command(name = "realty-scout", version, about, long_about = None)]
struct Cli {
    /// JSON file with crawl settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// First page of the listing index
    #[arg(long)]
    start_url: Option<String>,

    /// Number of listings to collect, rounded up to whole pages
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Where to write the records
    #[arg(short, long, default_value = "realty.json")]
    output: PathBuf,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn crawl_config(&self) -> anyhow::Result<CrawlConfig> {
        let mut config = match &self.config {
            Some(path) => CrawlConfig::from_file(path)?,
            None => CrawlConfig::default(),
        };
        if let Some(url) = &self.start_url {
            config.start_url = url.clone();
        }
        if let Some(count) = self.count {
            config.target_count = count;
        }
        if self.headed {
            config.headless = false;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("🏠 Realty Scout - RealtyLink rentals");
    info!("Press Ctrl+C to stop the crawl");

    let config = cli.crawl_config()?;
    let browser = ChromeBrowser::launch(&config)?;
    let session = Arc::new(browser.open_session()?);
    let scraper = RealtyLinkScraper::new(session, config);

    info!(
        "Collecting {} listings from {}",
        scraper.config().target_count,
        scraper.config().start_url
    );

    let outcome = tokio::select! {
        outcome = scraper.scrape() => outcome,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, closing the browser");
            drop(browser);
            std::process::exit(130);
        }
    };

    match outcome {
        Ok(records) => {
            info!("✅ Scraped {} listings from {}", records.len(), scraper.source_name());
            save(&cli.output, &records).await?;
            Ok(())
        }
        Err(aborted) => {
            error!("{}", aborted);
            if !aborted.salvaged.is_empty() {
                save(&cli.output, &aborted.salvaged).await?;
            }
            Err(aborted.into())
        }
    }
}

async fn save(path: &Path, records: &[ListingRecord]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("💾 Saved {} listings to {}", records.len(), path.display());
    Ok(())
}
