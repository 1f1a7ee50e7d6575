use crate::models::ListingRecord;
use std::time::Duration;
use thiserror::Error;

/// Failure of one crawl operation
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Could not parse {field} from {text:?}")]
    Parse { field: &'static str, text: String },

    #[error(transparent)]
    Session(#[from] anyhow::Error),
}

impl CrawlError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CrawlError::Timeout { .. })
    }

    pub fn parse(field: &'static str, text: impl Into<String>) -> Self {
        CrawlError::Parse {
            field,
            text: text.into(),
        }
    }
}

/// A run stopped by a fatal error, with the records extracted before it
#[derive(Debug, Error)]
#[error("Crawl aborted after {} listings: {error}", .salvaged.len())]
pub struct Aborted {
    #[source]
    pub error: CrawlError,
    pub salvaged: Vec<ListingRecord>,
}

/// Result type alias for crawl operations
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;
