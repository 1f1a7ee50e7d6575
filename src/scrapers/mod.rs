pub mod browser;
pub mod carousel;
pub mod error;
pub mod listing;
pub mod pagination;
pub mod realtylink;
pub mod selectors;
pub mod traits;
pub mod types;
pub mod wait;

#[cfg(test)]
mod fake;

pub use browser::ChromeBrowser;
pub use realtylink::RealtyLinkScraper;
pub use traits::ScraperTrait;
pub use types::CrawlConfig;
