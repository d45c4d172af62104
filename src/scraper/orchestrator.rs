//! Scrape run orchestration.
//!
//! One run owns one browser session: open the search page, then alternate
//! between discovering listings and opening them one at a time until enough
//! unique places are collected or discovery stops yielding anything new.

use tracing::{debug, info, warn};

use super::dedup::Deduplicator;
use super::discovery::ListingDiscoverer;
use super::error::ScrapeError;
use super::extract::FieldExtractor;
use super::selectors;
use crate::browser::{
    BrowserEngine, BrowserSession, EngineError, LaunchOptions, Locator, PageDriver, Viewport,
};
use crate::config::ScrapeConfig;
use crate::models::Place;

/// Called after each accepted place with `(accepted, target, place)`.
pub type ProgressCallback = Box<dyn Fn(usize, usize, &Place) + Send + Sync>;

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeReport {
    /// Accepted places, in extraction order.
    pub places: Vec<Place>,
    pub target: usize,
}

impl ScrapeReport {
    /// How many places short of the target the run ended.
    pub fn shortfall(&self) -> usize {
        self.target.saturating_sub(self.places.len())
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall() == 0
    }
}

/// Drives a browser engine through one search.
pub struct ScrapeOrchestrator<E> {
    engine: E,
    launch: LaunchOptions,
    viewport: Viewport,
    config: ScrapeConfig,
    extractor: FieldExtractor,
    progress: Option<ProgressCallback>,
}

impl<E: BrowserEngine> ScrapeOrchestrator<E> {
    pub fn new(
        engine: E,
        launch: LaunchOptions,
        viewport: Viewport,
        config: ScrapeConfig,
    ) -> Self {
        Self {
            engine,
            launch,
            viewport,
            config,
            extractor: FieldExtractor::new(),
            progress: None,
        }
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Collect up to `target` unique places for `query`.
    ///
    /// The browser session is closed before returning, whatever the outcome.
    pub async fn run(&self, query: &str, target: usize) -> Result<ScrapeReport, ScrapeError> {
        let url = self.config.search_url_for(query);

        let mut session = self
            .engine
            .launch(&self.launch)
            .await
            .map_err(ScrapeError::Launch)?;

        let result = self.run_in_session(session.as_mut(), &url, target).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser: {}", e);
        }
        result
    }

    async fn run_in_session(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        target: usize,
    ) -> Result<ScrapeReport, ScrapeError> {
        let page = session.new_page(self.viewport).await?;
        self.open_search(page.as_ref(), url).await?;
        self.collect(page.as_ref(), target).await
    }

    async fn open_search(&self, page: &dyn PageDriver, url: &str) -> Result<(), ScrapeError> {
        let timings = &self.config.timings;

        page.goto(url, timings.navigation_timeout())
            .await
            .map_err(|source| ScrapeError::Navigation {
                url: url.to_string(),
                source,
            })?;

        self.dismiss_consent(page).await;

        page.wait_for_selector(selectors::LISTING, timings.first_listing_timeout())
            .await
            .map_err(ScrapeError::NoListings)
    }

    /// Click through the consent interstitial if one is shown.
    async fn dismiss_consent(&self, page: &dyn PageDriver) {
        let attempt = async {
            if page.count(selectors::CONSENT_BUTTON).await? == 0 {
                return Ok::<_, EngineError>(false);
            }
            page.click(&Locator::first(selectors::CONSENT_BUTTON)).await?;
            Ok(true)
        };

        match attempt.await {
            Ok(true) => {
                debug!("Dismissed consent dialog");
                tokio::time::sleep(self.config.timings.consent_settle()).await;
            }
            Ok(false) => {}
            Err(e) => debug!("Consent dialog not dismissed: {}", e),
        }
    }

    async fn collect(
        &self,
        page: &dyn PageDriver,
        target: usize,
    ) -> Result<ScrapeReport, ScrapeError> {
        let timings = &self.config.timings;
        let discoverer = ListingDiscoverer::new(
            selectors::LISTING,
            self.config.overscan,
            self.config.discover_scroll_px,
            timings.scroll_settle(),
        );

        let mut places: Vec<Place> = Vec::with_capacity(target);
        let mut dedup = Deduplicator::new();
        // Listings before this position have been tried already.
        let mut cursor = 0;
        let mut stalled_cycles = 0;

        while places.len() < target {
            let handles = discoverer.discover(page, target).await?;

            if handles.len() <= cursor {
                stalled_cycles += 1;
                debug!(
                    "No new listings ({} rendered), stalled {} time(s)",
                    handles.len(),
                    stalled_cycles
                );
                if self.config.max_stalled_cycles > 0
                    && stalled_cycles >= self.config.max_stalled_cycles
                {
                    warn!(
                        "Listing feed stopped growing after {} cycles; collected {}/{}",
                        stalled_cycles,
                        places.len(),
                        target
                    );
                    break;
                }
            } else {
                stalled_cycles = 0;
            }

            for handle in handles.iter().skip(cursor) {
                if places.len() >= target {
                    break;
                }
                cursor += 1;

                let place = match self.open_listing(page, handle).await {
                    Ok(place) => place,
                    Err(e) => {
                        warn!("Skipping listing #{}: {}", handle.index + 1, e);
                        continue;
                    }
                };

                if !dedup.accept(&place) {
                    debug!("Skipping duplicate or unnamed listing #{}", handle.index + 1);
                    continue;
                }

                let accepted = places.len() + 1;
                info!("[{}/{}] Extracted: {}", accepted, target, place.name);
                if let Some(progress) = &self.progress {
                    progress(accepted, target, &place);
                }
                places.push(place);
            }

            if places.len() < target {
                match page.scroll_by(0.0, self.config.retry_scroll_px).await {
                    Ok(()) => tokio::time::sleep(timings.retry_settle()).await,
                    Err(e) => warn!("Scroll after short cycle failed: {}", e),
                }
            }
        }

        Ok(ScrapeReport { places, target })
    }

    /// Open one listing's detail view and extract it.
    async fn open_listing(
        &self,
        page: &dyn PageDriver,
        handle: &Locator,
    ) -> Result<Place, EngineError> {
        let timings = &self.config.timings;

        page.scroll_into_view(handle).await?;
        page.click(handle).await?;
        page.wait_for_selector(selectors::PLACE_NAME, timings.detail_timeout())
            .await?;
        tokio::time::sleep(timings.detail_settle()).await;

        Ok(self.extractor.extract(page).await)
    }
}
