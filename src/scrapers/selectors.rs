//! Markup contract with realtylink.org.
//!
//! These selectors break silently (optional fields) or fatally (mandatory
//! fields) whenever the site changes its markup.

use crate::scrapers::types::Locator;

/// `n / total` page indicator, present on index and detail pages
pub const PAGE_INDICATOR: Locator = Locator::Css(".pager-current");
pub const NEXT_PAGE: Locator = Locator::Css("li.next a");
/// Listing summary anchors, matched against the page source
pub const LISTING_LINK: &str = "a.property-thumbnail-summary-link";

pub const TITLE: Locator = Locator::XPath(r#"//span[@data-id="PageTitle"]"#);
pub const ADDRESS: Locator =
    Locator::XPath(r#"//h2[@itemprop="address" and contains(@class, "pt-1")]"#);
pub const DESCRIPTION: Locator = Locator::XPath(r#"//div[@itemprop="description"]"#);
pub const PRICE: Locator = Locator::Css(".price.text-right");
pub const BEDROOMS: Locator = Locator::Css(".cac");
pub const BATHROOMS: Locator = Locator::Css(".sdb");
pub const AREA: Locator = Locator::Css(".carac-value");

pub const PRIMARY_PHOTO: Locator = Locator::Css(".primary-photo-container");
pub const CAROUSEL: Locator = Locator::Css(".carousel");
pub const FULL_IMAGE: Locator = Locator::Css("#fullImg");
/// `current/total` counter inside the photo viewer
pub const CAROUSEL_COUNTER: Locator = Locator::XPath(r#"//div[@class="description"]/strong"#);

/// Marker of a resolved image address, as opposed to a placeholder
pub const IMAGE_SCHEME_MARKER: &str = "http";
/// Marker of an image served from the canonical media host
pub const MEDIA_HOST_MARKER: &str = "mediaserver";
