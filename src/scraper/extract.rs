//! Field extraction from an opened detail view.
//!
//! Every field is looked up on its own: a missing element or a failed query
//! leaves that field at its default and never affects the others.

use tracing::debug;

use super::selectors;
use crate::browser::{EngineError, Locator, PageDriver};
use crate::models::{Availability, Place, NO_INTRODUCTION};

/// Separates a category from its amenity in info fragments.
const INFO_SEPARATOR: char = '\u{b7}';
/// Separates the weekday label from today's hours.
const HOURS_SEPARATOR: char = '\u{22c5}';
const NARROW_NO_BREAK_SPACE: char = '\u{202f}';
const NO_BREAK_SPACE: char = '\u{a0}';

/// Builds a [`Place`] from whatever the current detail view shows.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldExtractor;

impl FieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract all fields. Never fails; absent fields keep their defaults.
    pub async fn extract(&self, page: &dyn PageDriver) -> Place {
        let mut place = Place {
            name: text_or_default(page, selectors::PLACE_NAME).await,
            address: text_or_default(page, selectors::ADDRESS).await,
            website: text_or_default(page, selectors::WEBSITE).await,
            phone_number: text_or_default(page, selectors::PHONE_NUMBER).await,
            whatsapp: text_or_default(page, selectors::WHATSAPP).await,
            place_type: text_or_default(page, selectors::PLACE_TYPE).await,
            ..Default::default()
        };

        place.introduction = lookup_text(page, selectors::INTRODUCTION)
            .await
            .unwrap_or_else(|| NO_INTRODUCTION.to_string());

        place.reviews_count = lookup_text(page, selectors::REVIEWS_COUNT)
            .await
            .and_then(|raw| parse_reviews_count(&raw));

        place.reviews_average = lookup_text(page, selectors::REVIEWS_AVERAGE)
            .await
            .and_then(|raw| parse_reviews_average(&raw));

        for selector in selectors::INFO_FRAGMENTS {
            if let Some(fragment) = lookup_text(page, selector).await {
                apply_info_fragment(&mut place, &fragment);
            }
        }

        if let Some(raw) = lookup_text(page, selectors::OPENS_AT).await {
            place.opens_at = parse_opens_at(&raw);
        }

        place
    }
}

/// Text of the first match, or `None` when absent, empty or unreadable.
async fn lookup_text(page: &dyn PageDriver, selector: &str) -> Option<String> {
    match try_lookup_text(page, selector).await {
        Ok(text) => text.filter(|t| !t.is_empty()),
        Err(e) => {
            debug!("Field lookup failed for {}: {}", selector, e);
            None
        }
    }
}

async fn try_lookup_text(
    page: &dyn PageDriver,
    selector: &str,
) -> Result<Option<String>, EngineError> {
    if page.count(selector).await? == 0 {
        return Ok(None);
    }
    page.inner_text(&Locator::first(selector)).await.map(Some)
}

async fn text_or_default(page: &dyn PageDriver, selector: &str) -> String {
    lookup_text(page, selector).await.unwrap_or_default()
}

/// Parse a review count such as `"(1,234)"`.
pub fn parse_reviews_count(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(*c, NO_BREAK_SPACE | '(' | ')' | ','))
        .collect();
    cleaned.trim().parse().ok()
}

/// Parse a rating such as `"4,5"` or `"3.2"`.
pub fn parse_reviews_average(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(' ', "").replace(',', ".");
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Mark amenities named in the second segment of an info fragment.
pub fn apply_info_fragment(place: &mut Place, fragment: &str) {
    let Some(detail) = fragment.split(INFO_SEPARATOR).nth(1) else {
        return;
    };
    let detail = detail.to_lowercase();
    if detail.contains("shop") {
        place.store_shopping = Availability::Yes;
    }
    if detail.contains("pickup") {
        place.in_store_pickup = Availability::Yes;
    }
    if detail.contains("delivery") {
        place.store_delivery = Availability::Yes;
    }
}

/// Today's hours with any leading weekday label removed.
pub fn parse_opens_at(raw: &str) -> String {
    if raw.contains(HOURS_SEPARATOR) {
        raw.split(HOURS_SEPARATOR)
            .nth(1)
            .unwrap_or_default()
            .replace(NARROW_NO_BREAK_SPACE, "")
    } else {
        raw.to_string()
    }
}
