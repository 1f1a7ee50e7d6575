use crate::scrapers::error::{CrawlError, CrawlResult};
use crate::scrapers::selectors;
use crate::scrapers::traits::Session;
use crate::scrapers::types::{CrawlConfig, Key};
use crate::scrapers::wait::{Condition, Waiter};
use std::time::Instant;
use tracing::{debug, warn};

/// Position in the photo viewer, read from its `current/total` caption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselCounter {
    pub current: u32,
    pub total: u32,
}

impl CarouselCounter {
    pub fn parse(text: &str) -> Option<Self> {
        let (current, total) = text.split_once('/')?;
        Some(Self {
            current: current.trim().parse().ok()?,
            total: total.trim().parse().ok()?,
        })
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }
}

enum Step {
    Advancing,
    Done,
}

/// Open the photo viewer and capture every full-size image URL in order.
///
/// One URL is taken before each ArrowRight, and the last one once the
/// counter reports the final position, so the result holds one more entry
/// than the number of key presses.
pub fn walk(session: &dyn Session, config: &CrawlConfig) -> CrawlResult<Vec<String>> {
    let waiter = Waiter::new(config.timeouts.poll_interval());
    let timeouts = &config.timeouts;

    waiter.until(
        session,
        &Condition::PresenceOf(selectors::PRIMARY_PHOTO),
        timeouts.brief(),
    )?;
    session.click(&selectors::PRIMARY_PHOTO)?;
    waiter.until(
        session,
        &Condition::PresenceOf(selectors::CAROUSEL),
        timeouts.element(),
    )?;

    let started = Instant::now();
    let mut urls = Vec::new();
    let mut last_seen: Option<CarouselCounter> = None;
    let mut step = Step::Advancing;
    // a counter that reports its total raises the limit to cover every photo
    let mut step_limit = config.carousel_step_limit;

    while let Step::Advancing = step {
        if urls.len() >= step_limit {
            return Err(CrawlError::Timeout {
                what: format!(
                    "carousel to reach its last photo within {} steps",
                    step_limit
                ),
                waited: started.elapsed(),
            });
        }

        urls.push(full_image(session, &waiter, config, selectors::IMAGE_SCHEME_MARKER)?);
        session.press_key(Key::ArrowRight)?;

        step = match read_counter(session, &waiter, config)? {
            Some(counter) if counter.is_last() => Step::Done,
            Some(counter) => {
                if last_seen.is_some_and(|seen| counter.current < seen.current) {
                    warn!("Carousel counter moved back to {}/{}", counter.current, counter.total);
                }
                last_seen = Some(counter);
                step_limit = step_limit.max(counter.total as usize + 1);
                Step::Advancing
            }
            None => {
                debug!("Carousel counter unresolved, stepping again");
                Step::Advancing
            }
        };
    }

    urls.push(full_image(session, &waiter, config, selectors::MEDIA_HOST_MARKER)?);
    debug!("Captured {} photos", urls.len());
    Ok(urls)
}

/// `src` of the full-size image once it contains `marker`
fn full_image(
    session: &dyn Session,
    waiter: &Waiter,
    config: &CrawlConfig,
    marker: &'static str,
) -> CrawlResult<String> {
    let element = config.timeouts.element();
    waiter.until(session, &Condition::PresenceOf(selectors::FULL_IMAGE), element)?;
    waiter.until(
        session,
        &Condition::AttributeContains {
            locator: selectors::FULL_IMAGE,
            attribute: "src",
            needle: marker,
        },
        element,
    )
}

/// Read the counter, giving each step a few chances to render it
fn read_counter(
    session: &dyn Session,
    waiter: &Waiter,
    config: &CrawlConfig,
) -> CrawlResult<Option<CarouselCounter>> {
    let counter = Condition::PresenceOf(selectors::CAROUSEL_COUNTER);

    for attempt in 1..=config.counter_attempts {
        match waiter.optional(session, &counter, config.timeouts.brief())? {
            Some(text) => match CarouselCounter::parse(&text) {
                Some(parsed) => return Ok(Some(parsed)),
                None => debug!("Unreadable carousel counter {:?} (attempt {})", text, attempt),
            },
            None => debug!("Carousel counter missing (attempt {})", attempt),
        }
    }

    Ok(None)
}
