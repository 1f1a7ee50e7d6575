use crate::models::ListingRecord;
use crate::scrapers::error::Aborted;
use crate::scrapers::types::{Key, Locator};
use anyhow::Result;
use async_trait::async_trait;

/// Capabilities the crawl needs from a live browser tab.
///
/// Lookups never wait: a missing element is `Ok(None)` / `Ok(false)`. Waiting
/// is the job of [`crate::scrapers::wait::Waiter`]. `Err` means the driver
/// itself failed.
pub trait Session: Send + Sync {
    fn navigate(&self, url: &str) -> Result<()>;

    fn reload(&self) -> Result<()>;

    /// Markup of the currently rendered document
    fn page_source(&self) -> Result<String>;

    /// Text of the first element matching `locator`
    fn text(&self, locator: &Locator) -> Result<Option<String>>;

    /// Attribute of the first element matching `locator`
    fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>>;

    /// Whether the first matching element is rendered and can take a click
    fn is_interactable(&self, locator: &Locator) -> Result<bool>;

    fn click(&self, locator: &Locator) -> Result<()>;

    /// Send a key press to the focused element
    fn press_key(&self, key: Key) -> Result<()>;
}

/// Common trait for listing scrapers
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Crawl the site and return every extracted listing
    async fn scrape(&self) -> std::result::Result<Vec<ListingRecord>, Aborted>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
