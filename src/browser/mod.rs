//! Browser engine capability.
//!
//! The scraper only talks to these traits, so it can run against Chrome via
//! chromiumoxide (CDP) or against an in-memory page in tests.

mod binary;
#[cfg(feature = "browser")]
mod chromium;
mod config;
mod types;

pub use binary::{find_chrome, launch_args, DEFAULT_CHROME_ARGS};
#[cfg(feature = "browser")]
pub use chromium::ChromiumEngine;
pub use config::BrowserEngineConfig;
pub use types::{EngineError, LaunchOptions, Locator, Viewport};

use std::time::Duration;

use async_trait::async_trait;

/// Something that can start a browser session.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    async fn launch(&self, options: &LaunchOptions)
        -> Result<Box<dyn BrowserSession>, EngineError>;
}

/// A running browser process.
#[async_trait]
pub trait BrowserSession: Send {
    /// Open a blank page with the given viewport.
    async fn new_page(&mut self, viewport: Viewport) -> Result<Box<dyn PageDriver>, EngineError>;

    /// Shut the browser down. Called exactly once, on every exit path.
    async fn close(&mut self) -> Result<(), EngineError>;
}

/// A single page. All selectors are XPath expressions.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), EngineError>;

    /// Number of elements currently matching `selector`. Zero is not an error.
    async fn count(&self, selector: &str) -> Result<usize, EngineError>;

    async fn inner_text(&self, locator: &Locator) -> Result<String, EngineError>;

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), EngineError>;

    async fn click(&self, locator: &Locator) -> Result<(), EngineError>;

    /// Move the pointer over the element, so later wheel events scroll
    /// whatever container it sits in.
    async fn hover(&self, locator: &Locator) -> Result<(), EngineError>;

    /// Resolve once `selector` matches at least one element.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<(), EngineError>;

    /// Mouse-wheel scroll at the current pointer position.
    async fn scroll_by(&self, dx: f64, dy: f64) -> Result<(), EngineError>;
}

// Stub for when browser feature is disabled
#[cfg(not(feature = "browser"))]
pub struct ChromiumEngine;

#[cfg(not(feature = "browser"))]
#[async_trait]
impl BrowserEngine for ChromiumEngine {
    async fn launch(
        &self,
        _options: &LaunchOptions,
    ) -> Result<Box<dyn BrowserSession>, EngineError> {
        Err(EngineError::Launch(
            "Browser support not compiled. Rebuild with: cargo build --features browser"
                .to_string(),
        ))
    }
}
