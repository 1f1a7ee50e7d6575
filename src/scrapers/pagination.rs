use crate::scrapers::error::{CrawlError, CrawlResult};
use crate::scrapers::selectors;
use crate::scrapers::traits::Session;
use crate::scrapers::types::CrawlConfig;
use crate::scrapers::wait::{Condition, Waiter};
use anyhow::anyhow;
use scraper::{Html, Selector};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Links gathered from the paginated index
#[derive(Debug, Default)]
pub struct Pagination {
    /// Listing hrefs in page order, duplicates kept
    pub links: Vec<String>,
    /// Last page number confirmed as rendered
    pub pages: u32,
    /// Why the walk stopped before covering every round, if it did
    pub abandoned: Option<CrawlError>,
}

/// Walk the listing index from the page currently rendered and collect links.
///
/// Each round waits for the page indicator to show exactly one more than the
/// last confirmed page, harvests the listing anchors, then clicks "next".
pub fn collect(session: &dyn Session, config: &CrawlConfig) -> CrawlResult<Pagination> {
    let waiter = Waiter::new(config.timeouts.poll_interval());
    let rounds = config.rounds();
    let mut result = Pagination::default();

    info!("Collecting links from {} index pages", rounds);

    for round in 0..rounds {
        let page = await_page(session, &waiter, config, result.pages + 1)?;
        let links = extract_links(&session.page_source()?)?;
        info!("Page {}: found {} listing links", page, links.len());
        result.links.extend(links);
        result.pages = page;

        if round + 1 == rounds {
            break;
        }

        if let Err(err) = next_page(session, &waiter, config) {
            warn!(
                "Stopping after page {} with {} links: {}",
                page,
                result.links.len(),
                err
            );
            result.abandoned = Some(err);
            break;
        }
    }

    Ok(result)
}

/// Poll the page indicator until it reads `expected`
fn await_page(
    session: &dyn Session,
    waiter: &Waiter,
    config: &CrawlConfig,
    expected: u32,
) -> CrawlResult<u32> {
    let deadline = config.timeouts.page_round();
    let started = Instant::now();
    let indicator = Condition::PresenceOf(selectors::PAGE_INDICATOR);

    loop {
        let remaining = deadline
            .saturating_sub(started.elapsed())
            .min(config.timeouts.element());
        let text = waiter.until(session, &indicator, remaining)?;
        let page = parse_page_number(&text)?;
        if page == expected {
            return Ok(page);
        }

        debug!("Page indicator reads {}, waiting for {}", page, expected);
        if started.elapsed() > deadline {
            return Err(CrawlError::Timeout {
                what: format!("page indicator to reach {}", expected),
                waited: deadline,
            });
        }
        waiter.pause();
    }
}

/// Click the "next page" control, retrying only this step
fn next_page(session: &dyn Session, waiter: &Waiter, config: &CrawlConfig) -> CrawlResult<()> {
    let control = Condition::ClickableAt(selectors::NEXT_PAGE);
    let attempts = config.next_page_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        let clicked = waiter
            .until(session, &control, config.timeouts.element())
            .and_then(|_| Ok(session.click(&selectors::NEXT_PAGE)?));
        match clicked {
            Ok(()) => return Ok(()),
            Err(err) => {
                debug!("Next page attempt {}/{} failed: {}", attempt, attempts, err);
                last_error = Some(err);
            }
        }
    }

    Err(CrawlError::Navigation(format!(
        "next page control unavailable after {} attempts: {}",
        attempts,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

/// Leading page number of an `n / total` indicator
pub fn parse_page_number(text: &str) -> CrawlResult<u32> {
    text.split('/')
        .next()
        .map(str::trim)
        .and_then(|n| n.replace(',', "").parse().ok())
        .ok_or_else(|| CrawlError::parse("page indicator", text))
}

/// `href` of every listing summary anchor, in document order
pub fn extract_links(html: &str) -> CrawlResult<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(selectors::LISTING_LINK)
        .map_err(|e| anyhow!("Invalid listing selector: {:?}", e))?;

    Ok(document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect())
}
