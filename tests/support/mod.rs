//! In-memory browser engine serving a fake listing feed.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use placescout::browser::{
    BrowserEngine, BrowserSession, EngineError, LaunchOptions, Locator, PageDriver, Viewport,
};
use placescout::config::{ScrapeConfig, Timings};
use placescout::scraper::{selectors, ScrapeOrchestrator};

/// Selector → text shown in a listing's detail view.
pub type Detail = HashMap<String, String>;

/// Detail view showing just a name.
pub fn named(name: &str) -> Option<Detail> {
    Some(detail(&[(selectors::PLACE_NAME, name)]))
}

/// Detail view with arbitrary fields.
pub fn detail(fields: &[(&str, &str)]) -> Detail {
    fields
        .iter()
        .map(|(selector, text)| (selector.to_string(), text.to_string()))
        .collect()
}

/// A listing whose detail view never renders.
pub fn broken() -> Option<Detail> {
    None
}

struct FeedState {
    listings: Vec<Option<Detail>>,
    rendered: usize,
    load_per_scroll: usize,
    current: Option<Detail>,
    consent_visible: bool,
    consent_clicked: bool,
    failing_selectors: HashSet<String>,
    navigation_fails: bool,
    visited: Vec<String>,
    clicked: Vec<usize>,
    hovered: Vec<usize>,
    scrolls: usize,
    dry_scrolls: usize,
}

impl FeedState {
    fn count(&self, selector: &str) -> Result<usize, EngineError> {
        if self.failing_selectors.contains(selector) {
            return Err(EngineError::Protocol(format!("query failed: {selector}")));
        }
        Ok(if selector == selectors::LISTING {
            self.rendered
        } else if selector == selectors::CONSENT_BUTTON {
            usize::from(self.consent_visible)
        } else {
            self.current
                .as_ref()
                .map_or(0, |d| usize::from(d.contains_key(selector)))
        })
    }
}

/// A fake search site. Clones share state, so tests keep one to inspect.
#[derive(Clone)]
pub struct MockSite {
    state: Arc<Mutex<FeedState>>,
    closed: Arc<AtomicBool>,
    launch_fails: bool,
}

impl MockSite {
    /// All listings rendered up front; scrolling loads nothing new.
    pub fn new(listings: Vec<Option<Detail>>) -> Self {
        let rendered = listings.len();
        Self {
            state: Arc::new(Mutex::new(FeedState {
                listings,
                rendered,
                load_per_scroll: 0,
                current: None,
                consent_visible: false,
                consent_clicked: false,
                failing_selectors: HashSet::new(),
                navigation_fails: false,
                visited: Vec::new(),
                clicked: Vec::new(),
                hovered: Vec::new(),
                scrolls: 0,
                dry_scrolls: 0,
            })),
            closed: Arc::new(AtomicBool::new(false)),
            launch_fails: false,
        }
    }

    /// Render `initially` listings, then `per_scroll` more on each scroll.
    pub fn lazy(self, initially: usize, per_scroll: usize) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.rendered = initially.min(state.listings.len());
            state.load_per_scroll = per_scroll;
        }
        self
    }

    /// Only every `(dry + 1)`-th scroll loads listings; the ones between
    /// load nothing.
    pub fn dry_scrolls(self, dry: usize) -> Self {
        self.state.lock().unwrap().dry_scrolls = dry;
        self
    }

    pub fn with_consent(self) -> Self {
        self.state.lock().unwrap().consent_visible = true;
        self
    }

    /// Make every query for `selector` fail with a protocol error.
    pub fn failing_selector(self, selector: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_selectors
            .insert(selector.to_string());
        self
    }

    pub fn failing_navigation(self) -> Self {
        self.state.lock().unwrap().navigation_fails = true;
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.launch_fails = true;
        self
    }

    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn consent_clicked(&self) -> bool {
        self.state.lock().unwrap().consent_clicked
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.lock().unwrap().visited.clone()
    }

    pub fn clicked(&self) -> Vec<usize> {
        self.state.lock().unwrap().clicked.clone()
    }

    /// Listing indices the pointer was moved over, in order.
    pub fn hovered(&self) -> Vec<usize> {
        self.state.lock().unwrap().hovered.clone()
    }

    pub fn scrolls(&self) -> usize {
        self.state.lock().unwrap().scrolls
    }

    /// Open the detail view of listing `index` directly.
    pub fn show(&self, index: usize) {
        let mut state = self.state.lock().unwrap();
        state.current = state.listings[index].clone();
    }

    pub fn page(&self) -> MockPage {
        MockPage { site: self.clone() }
    }
}

#[async_trait]
impl BrowserEngine for MockSite {
    async fn launch(
        &self,
        _options: &LaunchOptions,
    ) -> Result<Box<dyn BrowserSession>, EngineError> {
        if self.launch_fails {
            return Err(EngineError::Launch("no browser installed".to_string()));
        }
        Ok(Box::new(MockSession { site: self.clone() }))
    }
}

struct MockSession {
    site: MockSite,
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn new_page(&mut self, _viewport: Viewport) -> Result<Box<dyn PageDriver>, EngineError> {
        Ok(Box::new(self.site.page()))
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        self.site.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct MockPage {
    site: MockSite,
}

impl MockPage {
    fn state(&self) -> std::sync::MutexGuard<'_, FeedState> {
        self.site.state.lock().unwrap()
    }
}

#[async_trait]
impl PageDriver for MockPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), EngineError> {
        let mut state = self.state();
        state.visited.push(url.to_string());
        if state.navigation_fails {
            return Err(EngineError::timeout(format!("navigation to {url}"), timeout));
        }
        Ok(())
    }

    async fn count(&self, selector: &str) -> Result<usize, EngineError> {
        self.state().count(selector)
    }

    async fn inner_text(&self, locator: &Locator) -> Result<String, EngineError> {
        let state = self.state();
        if state.count(&locator.selector)? <= locator.index {
            return Err(EngineError::not_found(locator));
        }
        if locator.selector == selectors::LISTING {
            return Ok(format!("Listing {}", locator.index + 1));
        }
        state
            .current
            .as_ref()
            .and_then(|d| d.get(&locator.selector).cloned())
            .ok_or_else(|| EngineError::not_found(locator))
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), EngineError> {
        if self.state().count(&locator.selector)? <= locator.index {
            return Err(EngineError::not_found(locator));
        }
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<(), EngineError> {
        let mut state = self.state();
        if state.count(&locator.selector)? <= locator.index {
            return Err(EngineError::not_found(locator));
        }
        if locator.selector == selectors::LISTING {
            state.clicked.push(locator.index);
            state.current = state.listings[locator.index].clone();
        } else if locator.selector == selectors::CONSENT_BUTTON {
            state.consent_visible = false;
            state.consent_clicked = true;
        }
        Ok(())
    }

    async fn hover(&self, locator: &Locator) -> Result<(), EngineError> {
        let mut state = self.state();
        if state.count(&locator.selector)? <= locator.index {
            return Err(EngineError::not_found(locator));
        }
        if locator.selector == selectors::LISTING {
            state.hovered.push(locator.index);
        }
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<(), EngineError> {
        match self.state().count(selector) {
            Ok(n) if n > 0 => Ok(()),
            _ => Err(EngineError::timeout(selector, timeout)),
        }
    }

    async fn scroll_by(&self, _dx: f64, _dy: f64) -> Result<(), EngineError> {
        let mut state = self.state();
        state.scrolls += 1;
        if state.scrolls % (state.dry_scrolls + 1) == 0 {
            state.rendered = (state.rendered + state.load_per_scroll).min(state.listings.len());
        }
        Ok(())
    }
}

/// Orchestrator over `site` with no settle delays.
pub fn orchestrator(site: &MockSite, max_stalled_cycles: usize) -> ScrapeOrchestrator<MockSite> {
    let config = ScrapeConfig {
        timings: Timings::immediate(),
        max_stalled_cycles,
        ..Default::default()
    };
    ScrapeOrchestrator::new(
        site.clone(),
        LaunchOptions::default(),
        Viewport::default(),
        config,
    )
}
