use crate::models::{region_of, ListingRecord};
use crate::scrapers::carousel;
use crate::scrapers::error::{CrawlError, CrawlResult};
use crate::scrapers::selectors;
use crate::scrapers::traits::Session;
use crate::scrapers::types::{CrawlConfig, Locator};
use crate::scrapers::wait::{Condition, Waiter};
use chrono::Utc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Visit one listing and extract its record.
///
/// Title, address, price and area must be present. Description and room
/// counts are recorded as absent when they do not show up quickly. The page
/// is reloaded after a successful extraction to drop the open photo viewer.
pub fn extract(
    session: &dyn Session,
    config: &CrawlConfig,
    link: &str,
) -> CrawlResult<ListingRecord> {
    let waiter = Waiter::new(config.timeouts.poll_interval());
    let timeouts = &config.timeouts;
    let page_link = config.listing_url(link);

    debug!("Opening listing {}", page_link);
    session.navigate(&page_link)?;
    thread::sleep(timeouts.settle());
    waiter.until(
        session,
        &Condition::PresenceOf(selectors::PAGE_INDICATOR),
        timeouts.element(),
    )?;

    let read = |locator: Locator, timeout: Duration| {
        waiter.until(session, &Condition::PresenceOf(locator), timeout)
    };
    let read_optional = |locator: Locator| {
        waiter.optional(session, &Condition::PresenceOf(locator), timeouts.brief())
    };

    let title = read(selectors::TITLE, timeouts.element())?;
    let address = read(selectors::ADDRESS, timeouts.element())?;
    let region = region_of(&address);
    let description = read_optional(selectors::DESCRIPTION)?;
    let price = read(selectors::PRICE, timeouts.brief())?;
    let bedrooms = read_optional(selectors::BEDROOMS)?
        .map(|text| parse_count("bedrooms", &text))
        .transpose()?;
    let bathrooms = read_optional(selectors::BATHROOMS)?
        .map(|text| parse_count("bathrooms", &text))
        .transpose()?;
    let area = parse_area(&read(selectors::AREA, timeouts.brief())?)?;
    let image_urls = carousel::walk(session, config)?;

    let record = ListingRecord {
        page_link,
        title,
        address,
        region,
        description,
        price,
        bedrooms,
        bathrooms,
        area,
        image_urls,
        last_check_date: Utc::now(),
    };

    session.reload()?;
    info!(
        "Extracted {} ({}, {} photos)",
        record.page_link,
        record.price,
        record.image_urls.len()
    );
    Ok(record)
}

fn leading_token(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or_default()
}

/// Room count from text such as `"3 bedrooms"`
pub fn parse_count(field: &'static str, text: &str) -> CrawlResult<u32> {
    leading_token(text)
        .parse()
        .map_err(|_| CrawlError::parse(field, text))
}

/// Living area from text such as `"1,050 sqft"`
pub fn parse_area(text: &str) -> CrawlResult<u64> {
    leading_token(text)
        .replace(',', "")
        .parse()
        .map_err(|_| CrawlError::parse("area", text))
}
