//! Listing discovery in the lazily-rendered result feed.

use std::time::Duration;

use tracing::{debug, warn};

use crate::browser::{EngineError, Locator, PageDriver};

/// Reveals listings by scrolling the result feed.
///
/// The feed only grows, so the handle at position `i` keeps pointing at the
/// same listing across calls.
#[derive(Debug, Clone)]
pub struct ListingDiscoverer {
    selector: String,
    overscan: usize,
    scroll_px: f64,
    settle: Duration,
}

impl ListingDiscoverer {
    pub fn new(
        selector: impl Into<String>,
        overscan: usize,
        scroll_px: f64,
        settle: Duration,
    ) -> Self {
        Self {
            selector: selector.into(),
            overscan,
            scroll_px,
            settle,
        }
    }

    /// Handles for every listing currently rendered.
    ///
    /// When fewer than `target + overscan` are rendered, hovers the last
    /// rendered listing so the wheel lands on the feed rather than the map,
    /// scrolls once and waits for the feed to load more before reading again. There is no
    /// retry limit here; the orchestrator decides when discovery has stalled.
    pub async fn discover(
        &self,
        page: &dyn PageDriver,
        target: usize,
    ) -> Result<Vec<Locator>, EngineError> {
        let mut rendered = page.count(&self.selector).await?;

        if rendered < target.saturating_add(self.overscan) {
            debug!("{} listings rendered, scrolling for more", rendered);
            if rendered > 0 {
                let last = Locator::nth(self.selector.as_str(), rendered - 1);
                if let Err(e) = page.hover(&last).await {
                    debug!("Could not hover last listing: {}", e);
                }
            }
            match page.scroll_by(0.0, self.scroll_px).await {
                Ok(()) => {
                    tokio::time::sleep(self.settle).await;
                    rendered = page.count(&self.selector).await?;
                }
                Err(e) => warn!("Scroll for more listings failed: {}", e),
            }
        }

        Ok((0..rendered)
            .map(|i| Locator::nth(self.selector.as_str(), i))
            .collect())
    }
}
