use crate::models::ListingRecord;
use crate::scrapers::error::{Aborted, CrawlError};
use crate::scrapers::listing;
use crate::scrapers::pagination;
use crate::scrapers::traits::{ScraperTrait, Session};
use crate::scrapers::types::CrawlConfig;
use anyhow::anyhow;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Crawl the rental index, then extract every collected listing in order.
///
/// The first fatal listing error stops the run; records extracted before it
/// are handed back inside [`Aborted`].
pub fn run(session: &dyn Session, config: &CrawlConfig) -> Result<Vec<ListingRecord>, Aborted> {
    let mut records = Vec::new();
    let abort = |error: CrawlError, salvaged: Vec<ListingRecord>| Aborted { error, salvaged };

    info!("Opening listing index {}", config.start_url);
    if let Err(err) = session.navigate(&config.start_url) {
        return Err(abort(err.into(), records));
    }

    let pagination = match pagination::collect(session, config) {
        Ok(pagination) => pagination,
        Err(err) => return Err(abort(err, records)),
    };
    if let Some(reason) = &pagination.abandoned {
        warn!("Link collection ended early: {}", reason);
    }
    info!(
        "Collected {} links from {} pages",
        pagination.links.len(),
        pagination.pages
    );

    let total = pagination.links.len();
    for (idx, link) in pagination.links.iter().enumerate() {
        info!("Listing {}/{}: {}", idx + 1, total, link);
        match listing::extract(session, config, link) {
            Ok(record) => records.push(record),
            Err(err) => return Err(abort(err, records)),
        }
    }

    info!("Extracted {} listings", records.len());
    Ok(records)
}

/// realtylink.org rental scraper over a shared browser session
pub struct RealtyLinkScraper<S> {
    session: Arc<S>,
    config: CrawlConfig,
}

impl<S: Session + 'static> RealtyLinkScraper<S> {
    pub fn new(session: Arc<S>, config: CrawlConfig) -> Self {
        Self { session, config }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }
}

#[async_trait]
impl<S: Session + 'static> ScraperTrait for RealtyLinkScraper<S> {
    async fn scrape(&self) -> Result<Vec<ListingRecord>, Aborted> {
        let session = Arc::clone(&self.session);
        let config = self.config.clone();

        // Every wait blocks, so the crawl runs off the async workers
        tokio::task::spawn_blocking(move || run(session.as_ref(), &config))
            .await
            .unwrap_or_else(|join_err| {
                Err(Aborted {
                    error: anyhow!("Crawl task failed: {}", join_err).into(),
                    salvaged: Vec::new(),
                })
            })
    }

    fn source_name(&self) -> &'static str {
        "RealtyLink"
    }
}
