//! Scripted in-memory site used by the crawl tests.

use crate::scrapers::selectors;
use crate::scrapers::traits::Session;
use crate::scrapers::types::{CrawlConfig, Key, Locator, Timeouts};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub const INDEX_URL: &str = "https://realtylink.test/en/properties~for-rent";
pub const BASE_URL: &str = "https://realtylink.test";

/// Config pointing at the fake site with millisecond budgets
pub fn fast_config(target_count: usize) -> CrawlConfig {
    CrawlConfig {
        start_url: INDEX_URL.to_string(),
        base_url: BASE_URL.to_string(),
        target_count,
        carousel_step_limit: 50,
        timeouts: Timeouts {
            poll_interval_ms: 1,
            element_ms: 30,
            brief_ms: 5,
            page_round_ms: 60,
            settle_ms: 0,
        },
        ..CrawlConfig::default()
    }
}

/// Hrefs for one index page, `count` listings starting at `first`
pub fn page_links(first: usize, count: usize) -> Vec<String> {
    (first..first + count)
        .map(|i| format!("/en/apartment~for-rent/montreal/{}", i))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct FakeListing {
    pub title: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub area: Option<String>,
    pub images: Vec<String>,
}

impl FakeListing {
    /// Listing with every field present and `images` photos on the media host
    pub fn complete(images: usize) -> Self {
        Self {
            title: Some("Apartment for rent".to_string()),
            address: Some("123 Main St, Montreal, Quebec".to_string()),
            description: Some("Bright unit close to the metro.".to_string()),
            price: Some("$1,850 /month".to_string()),
            bedrooms: Some("2 bedrooms".to_string()),
            bathrooms: Some("1 bathroom".to_string()),
            area: Some("1,050 sqft".to_string()),
            images: (1..=images)
                .map(|i| format!("https://mediaserver.realtylink.test/photo/{}.jpg", i))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Location {
    Blank,
    Index(usize),
    Listing(String),
}

#[derive(Debug)]
pub struct FakeSite {
    pub index_pages: Vec<Vec<String>>,
    /// How many pages one "next" click moves the index
    pub page_step: usize,
    pub next_control: bool,
    /// Clicks on "next" that the page swallows before one goes through
    pub next_click_failures: usize,
    pub listings: HashMap<String, FakeListing>,
    /// Counter reads that come back empty before the counter renders
    pub counter_blackout: usize,
    pub counter_visible: bool,
    location: Location,
    viewer_open: bool,
    image_pos: usize,
    actions: Vec<String>,
}

impl FakeSite {
    pub fn new(index_pages: Vec<Vec<String>>) -> Self {
        Self {
            index_pages,
            page_step: 1,
            next_control: true,
            next_click_failures: 0,
            listings: HashMap::new(),
            counter_blackout: 0,
            counter_visible: true,
            location: Location::Blank,
            viewer_open: false,
            image_pos: 0,
            actions: Vec::new(),
        }
    }

    pub fn with_listing(mut self, link: &str, listing: FakeListing) -> Self {
        self.listings.insert(format!("{}{}", BASE_URL, link), listing);
        self
    }

    fn listing(&self) -> Option<&FakeListing> {
        match &self.location {
            Location::Listing(url) => self.listings.get(url),
            _ => None,
        }
    }

    fn has_next(&self) -> bool {
        match self.location {
            Location::Index(page) => self.next_control && page + 1 < self.index_pages.len(),
            _ => false,
        }
    }

    fn text(&mut self, locator: &Locator) -> Option<String> {
        if *locator == selectors::PAGE_INDICATOR {
            return match self.location {
                Location::Index(page) => {
                    Some(format!("{} / {}", page + 1, self.index_pages.len()))
                }
                Location::Listing(_) => Some("1 / 1".to_string()),
                Location::Blank => None,
            };
        }
        if *locator == selectors::NEXT_PAGE {
            return self.has_next().then(|| "Next".to_string());
        }
        if *locator == selectors::CAROUSEL_COUNTER {
            if !self.viewer_open || !self.counter_visible {
                return None;
            }
            if self.counter_blackout > 0 {
                self.counter_blackout -= 1;
                return None;
            }
            let total = self.listing()?.images.len();
            return Some(format!("{}/{}", self.image_pos + 1, total));
        }

        let viewer_open = self.viewer_open;
        let listing = self.listing()?;
        match *locator {
            l if l == selectors::TITLE => listing.title.clone(),
            l if l == selectors::ADDRESS => listing.address.clone(),
            l if l == selectors::DESCRIPTION => listing.description.clone(),
            l if l == selectors::PRICE => listing.price.clone(),
            l if l == selectors::BEDROOMS => listing.bedrooms.clone(),
            l if l == selectors::BATHROOMS => listing.bathrooms.clone(),
            l if l == selectors::AREA => listing.area.clone(),
            l if l == selectors::PRIMARY_PHOTO => {
                (!listing.images.is_empty()).then(String::new)
            }
            l if l == selectors::CAROUSEL || l == selectors::FULL_IMAGE => {
                viewer_open.then(String::new)
            }
            _ => None,
        }
    }

    fn attribute(&mut self, locator: &Locator, name: &str) -> Option<String> {
        if *locator == selectors::FULL_IMAGE && name == "src" && self.viewer_open {
            return self.listing()?.images.get(self.image_pos).cloned();
        }
        None
    }

    fn source(&self) -> String {
        let anchors = match self.location {
            Location::Index(page) => self
                .index_pages
                .get(page)
                .map(|links| {
                    links
                        .iter()
                        .map(|href| {
                            format!(
                                r#"<div class="thumbnail"><a class="property-thumbnail-summary-link" href="{}">Listing</a></div>"#,
                                href
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .unwrap_or_default(),
            _ => String::new(),
        };
        format!("<html><body>{}</body></html>", anchors)
    }
}

/// [`Session`] over a [`FakeSite`], recording every driver action
pub struct FakeSession {
    site: Mutex<FakeSite>,
}

impl FakeSession {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Mutex::new(site),
        }
    }

    fn site(&self) -> MutexGuard<'_, FakeSite> {
        self.site.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn actions(&self) -> Vec<String> {
        self.site().actions.clone()
    }

    pub fn count_actions(&self, prefix: &str) -> usize {
        self.site()
            .actions
            .iter()
            .filter(|action| action.starts_with(prefix))
            .count()
    }

    /// Put the fake on index page `page` without recording a navigation
    pub fn show_index(&self, page: usize) {
        self.site().location = Location::Index(page);
    }
}

impl Session for FakeSession {
    fn navigate(&self, url: &str) -> Result<()> {
        let mut site = self.site();
        site.actions.push(format!("navigate {}", url));
        site.viewer_open = false;
        site.location = if url == INDEX_URL {
            Location::Index(0)
        } else if site.listings.contains_key(url) {
            Location::Listing(url.to_string())
        } else {
            Location::Blank
        };
        Ok(())
    }

    fn reload(&self) -> Result<()> {
        let mut site = self.site();
        site.actions.push("reload".to_string());
        site.viewer_open = false;
        site.image_pos = 0;
        Ok(())
    }

    fn page_source(&self) -> Result<String> {
        Ok(self.site().source())
    }

    fn text(&self, locator: &Locator) -> Result<Option<String>> {
        Ok(self.site().text(locator))
    }

    fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        Ok(self.site().attribute(locator, name))
    }

    fn is_interactable(&self, locator: &Locator) -> Result<bool> {
        Ok(self.site().text(locator).is_some())
    }

    fn click(&self, locator: &Locator) -> Result<()> {
        let mut site = self.site();
        if *locator == selectors::NEXT_PAGE && site.has_next() {
            if site.next_click_failures > 0 {
                site.next_click_failures -= 1;
                site.actions.push("failed click next".to_string());
                return Err(anyhow!("element is not clickable at point"));
            }
            site.actions.push("click next".to_string());
            if let Location::Index(page) = site.location {
                site.location = Location::Index(page + site.page_step);
            }
            return Ok(());
        }
        if *locator == selectors::PRIMARY_PHOTO && site.text(locator).is_some() {
            site.actions.push("click photo".to_string());
            site.viewer_open = true;
            site.image_pos = 0;
            return Ok(());
        }
        Err(anyhow!("no element matches {}", locator))
    }

    fn press_key(&self, key: Key) -> Result<()> {
        let mut site = self.site();
        site.actions.push(format!("key {}", key.name()));
        if site.viewer_open {
            let last = site.listing().map(|l| l.images.len()).unwrap_or(1).max(1) - 1;
            site.image_pos = (site.image_pos + 1).min(last);
        }
        Ok(())
    }
}

/// Session whose driver has gone away
pub struct BrokenSession;

impl Session for BrokenSession {
    fn navigate(&self, _url: &str) -> Result<()> {
        Err(anyhow!("Unable to find session"))
    }

    fn reload(&self) -> Result<()> {
        Err(anyhow!("Unable to find session"))
    }

    fn page_source(&self) -> Result<String> {
        Err(anyhow!("Unable to find session"))
    }

    fn text(&self, _locator: &Locator) -> Result<Option<String>> {
        Err(anyhow!("Unable to find session"))
    }

    fn attribute(&self, _locator: &Locator, _name: &str) -> Result<Option<String>> {
        Err(anyhow!("Unable to find session"))
    }

    fn is_interactable(&self, _locator: &Locator) -> Result<bool> {
        Err(anyhow!("Unable to find session"))
    }

    fn click(&self, _locator: &Locator) -> Result<()> {
        Err(anyhow!("Unable to find session"))
    }

    fn press_key(&self, _key: Key) -> Result<()> {
        Err(anyhow!("Unable to find session"))
    }
}
