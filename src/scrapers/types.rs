use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// How an element is looked up in the rendered document.
///
/// Class-name and id lookups are written as CSS (`.pager-current`, `#fullImg`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(&'static str),
    XPath(&'static str),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css `{}`", selector),
            Locator::XPath(path) => write!(f, "xpath `{}`", path),
        }
    }
}

/// Key-press signals sent to the focused element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
}

impl Key {
    /// Key name as understood by the DevTools input domain
    pub fn name(self) -> &'static str {
        match self {
            Key::ArrowRight => "ArrowRight",
        }
    }
}

/// Wait budgets, stored in milliseconds so config files stay readable
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Interval between two probes of the same condition
    pub poll_interval_ms: u64,
    /// Budget for elements that must appear (page indicator, title, viewer)
    pub element_ms: u64,
    /// Budget for quick reads (price, area, optional fields, counter)
    pub brief_ms: u64,
    /// Overall deadline for one pagination round to observe the next page
    pub page_round_ms: u64,
    /// Pause after navigating to a listing before probing it
    pub settle_ms: u64,
}

impl Timeouts {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn element(&self) -> Duration {
        Duration::from_millis(self.element_ms)
    }

    pub fn brief(&self) -> Duration {
        Duration::from_millis(self.brief_ms)
    }

    pub fn page_round(&self) -> Duration {
        Duration::from_millis(self.page_round_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            element_ms: 10_000,
            brief_ms: 1_000,
            page_round_ms: 10_000,
            settle_ms: 1_000,
        }
    }
}

/// Parameters of one crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// First page of the paginated listing index
    pub start_url: String,
    /// Prefix joined with the relative listing hrefs
    pub base_url: String,
    /// Number of listings wanted, rounded up to whole pages
    pub target_count: usize,
    /// Listings per index page on the site
    pub page_size: usize,
    /// Attempts at activating the "next page" control before giving up
    pub next_page_attempts: u32,
    /// Counter reads after each carousel step before stepping again
    pub counter_attempts: u32,
    /// Upper bound on carousel steps for one listing
    pub carousel_step_limit: usize,
    /// Run Chrome without a window
    pub headless: bool,
    pub timeouts: Timeouts,
}

impl CrawlConfig {
    /// Load a config from a JSON file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Number of index pages needed to cover `target_count`
    pub fn rounds(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.target_count.div_ceil(self.page_size)
    }

    /// Absolute URL of a listing href
    pub fn listing_url(&self, link: &str) -> String {
        format!("{}{}", self.base_url, link)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: "https://realtylink.org/en/properties~for-rent".to_string(),
            base_url: "https://realtylink.org".to_string(),
            target_count: 60,
            page_size: 20,
            next_page_attempts: 3,
            counter_attempts: 6,
            carousel_step_limit: 200,
            headless: true,
            timeouts: Timeouts::default(),
        }
    }
}
