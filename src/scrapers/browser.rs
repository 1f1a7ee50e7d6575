use crate::scrapers::traits::Session;
use crate::scrapers::types::{CrawlConfig, Key, Locator};
use anyhow::{anyhow, Context, Result};
use headless_chrome::browser::tab::NoElementFound;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::sync::Arc;
use tracing::{debug, info};

/// Window size standing in for a maximized window
const WINDOW_SIZE: (u32, u32) = (1920, 1080);

/// Chrome process driven over the DevTools protocol
pub struct ChromeBrowser {
    browser: Browser,
}

impl ChromeBrowser {
    /// Launch Chrome for a crawl
    pub fn launch(config: &CrawlConfig) -> Result<Self> {
        info!(
            "Launching {} Chrome...",
            if config.headless { "headless" } else { "headed" }
        );

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some(WINDOW_SIZE))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

        Ok(Self { browser })
    }

    /// Open the tab the crawl runs in
    pub fn open_session(&self) -> Result<ChromeSession> {
        let tab = self.browser.new_tab().context("Failed to open browser tab")?;
        Ok(ChromeSession { tab })
    }
}

/// [`Session`] backed by one Chrome tab
pub struct ChromeSession {
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// First element matching `locator`, if the document currently has one
    fn find(&self, locator: &Locator) -> Result<Option<Element<'_>>> {
        let found = match locator {
            Locator::Css(selector) => self.tab.find_element(selector),
            Locator::XPath(path) => self.tab.find_element_by_xpath(path),
        };
        missing_as_none(found).with_context(|| format!("Failed to query {}", locator))
    }
}

/// Turn headless_chrome's "no element" error into `None`; other errors mean
/// the DevTools connection itself failed.
fn missing_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is::<NoElementFound>() => {
            debug!("{}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

impl Session for ChromeSession {
    fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .with_context(|| format!("Failed to navigate to {}", url))?;
        Ok(())
    }

    fn reload(&self) -> Result<()> {
        self.tab
            .reload(false, None)
            .and_then(|tab| tab.wait_until_navigated())
            .context("Failed to reload page")?;
        Ok(())
    }

    fn page_source(&self) -> Result<String> {
        self.tab.get_content().context("Failed to read page source")
    }

    fn text(&self, locator: &Locator) -> Result<Option<String>> {
        match self.find(locator)? {
            Some(element) => missing_as_none(element.get_inner_text()),
            None => Ok(None),
        }
    }

    fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        match self.find(locator)? {
            Some(element) => Ok(missing_as_none(element.get_attribute_value(name))?.flatten()),
            None => Ok(None),
        }
    }

    fn is_interactable(&self, locator: &Locator) -> Result<bool> {
        // hidden elements have no box model
        Ok(self
            .find(locator)?
            .and_then(|element| element.get_box_model().ok())
            .is_some_and(|model| model.width > 0.0 && model.height > 0.0))
    }

    fn click(&self, locator: &Locator) -> Result<()> {
        let element = self
            .find(locator)?
            .ok_or_else(|| anyhow!("No element matches {}", locator))?;
        element
            .click()
            .with_context(|| format!("Failed to click {}", locator))?;
        Ok(())
    }

    fn press_key(&self, key: Key) -> Result<()> {
        self.tab
            .press_key(key.name())
            .with_context(|| format!("Failed to press {}", key.name()))?;
        Ok(())
    }
}
