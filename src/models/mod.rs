use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One extracted listing, assembled once per detail-page visit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub page_link: String,
    pub title: String,
    pub address: String,
    /// Address without its first comma-delimited component
    pub region: String,
    pub description: Option<String>,
    /// Price as displayed on the page, currency and period included
    pub price: String,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area: u64,
    pub image_urls: Vec<String>,
    pub last_check_date: DateTime<Utc>,
}

/// Derive the region from a listing address.
///
/// `"123 Main St, Montreal, Quebec"` becomes `"Montreal, Quebec"`; an address
/// without a comma has no region.
pub fn region_of(address: &str) -> String {
    address
        .split(", ")
        .skip(1)
        .collect::<Vec<_>>()
        .join(", ")
}
