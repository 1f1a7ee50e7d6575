use crate::scrapers::error::{CrawlError, CrawlResult};
use crate::scrapers::traits::Session;
use crate::scrapers::types::Locator;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use tracing::trace;

/// Something the rendered document must show before the crawl moves on
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// An element matches; resolves to its text
    PresenceOf(Locator),
    /// The element can take a click; resolves to its text
    ClickableAt(Locator),
    /// The element's attribute contains `needle`; resolves to the attribute
    AttributeContains {
        locator: Locator,
        attribute: &'static str,
        needle: &'static str,
    },
}

impl Condition {
    /// Check the condition once, returning the resolved value if it holds
    fn probe(&self, session: &dyn Session) -> anyhow::Result<Option<String>> {
        match self {
            Condition::PresenceOf(locator) => {
                Ok(session.text(locator)?.map(|text| text.trim().to_string()))
            }
            Condition::ClickableAt(locator) => {
                if !session.is_interactable(locator)? {
                    return Ok(None);
                }
                Ok(Some(session.text(locator)?.unwrap_or_default().trim().to_string()))
            }
            Condition::AttributeContains {
                locator,
                attribute,
                needle,
            } => Ok(session
                .attribute(locator, attribute)?
                .filter(|value| value.contains(*needle))),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::PresenceOf(locator) => write!(f, "presence of {}", locator),
            Condition::ClickableAt(locator) => write!(f, "clickable {}", locator),
            Condition::AttributeContains {
                locator,
                attribute,
                needle,
            } => write!(f, "{} of {} to contain {:?}", attribute, locator, needle),
        }
    }
}

/// Polls the live document until a [`Condition`] holds or time runs out
#[derive(Debug, Clone, Copy)]
pub struct Waiter {
    poll_interval: Duration,
}

impl Waiter {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Wait for `condition`, probing at least once.
    ///
    /// Driver failures are returned as soon as they happen; only the
    /// condition itself is retried.
    pub fn until(
        &self,
        session: &dyn Session,
        condition: &Condition,
        timeout: Duration,
    ) -> CrawlResult<String> {
        let started = Instant::now();
        loop {
            if let Some(value) = condition.probe(session)? {
                return Ok(value);
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                trace!("{} not satisfied after {:?}", condition, elapsed);
                return Err(CrawlError::Timeout {
                    what: condition.to_string(),
                    waited: timeout,
                });
            }
            thread::sleep(self.poll_interval.min(timeout - elapsed));
        }
    }

    /// Best-effort variant of [`Waiter::until`]: a timeout means the value is absent
    pub fn optional(
        &self,
        session: &dyn Session,
        condition: &Condition,
        timeout: Duration,
    ) -> CrawlResult<Option<String>> {
        match self.until(session, condition, timeout) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_timeout() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Sleep one poll interval
    pub fn pause(&self) {
        thread::sleep(self.poll_interval);
    }
}
