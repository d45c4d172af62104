//! Chrome engine backed by chromiumoxide (CDP).

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType,
};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::binary::{find_chrome, launch_args};
use super::types::{EngineError, LaunchOptions, Locator, Viewport};
use super::{BrowserEngine, BrowserSession, PageDriver};

/// Horizontal pointer position inside the left-hand results panel.
const RESULTS_PANEL_X: f64 = 200.0;

/// How often `wait_for_selector` re-queries the DOM.
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

fn protocol(e: CdpError) -> EngineError {
    EngineError::Protocol(e.to_string())
}

/// Launches a local Chrome/Chromium process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromiumEngine;

#[async_trait]
impl BrowserEngine for ChromiumEngine {
    async fn launch(
        &self,
        options: &LaunchOptions,
    ) -> Result<Box<dyn BrowserSession>, EngineError> {
        let chrome_path = find_chrome(options.executable.as_deref())?;
        info!(
            "Launching browser {} (headless={})",
            chrome_path.display(),
            options.headless
        );

        let mut builder = BrowserConfig::builder().chrome_executable(chrome_path);

        // Set headless mode (with_head means NOT headless, confusingly)
        if !options.headless {
            builder = builder.with_head();
        }

        for arg in launch_args(&options.args) {
            builder = builder.arg(arg);
        }

        let config = builder
            .build()
            .map_err(|e| EngineError::Launch(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| EngineError::Launch(e.to_string()))?;

        // Spawn handler task
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn new_page(&mut self, viewport: Viewport) -> Result<Box<dyn PageDriver>, EngineError> {
        let page = self.browser.new_page("about:blank").await.map_err(protocol)?;
        page.execute(SetDeviceMetricsOverrideParams::new(
            i64::from(viewport.width),
            i64::from(viewport.height),
            1.0,
            false,
        ))
        .await
        .map_err(protocol)?;

        // Until a listing is hovered or clicked, wheel events go to the
        // results panel, which is narrower than a quarter of a wide viewport.
        let pointer = (
            RESULTS_PANEL_X.min(f64::from(viewport.width) / 2.0),
            f64::from(viewport.height) / 2.0,
        );

        Ok(Box::new(ChromiumPage {
            page,
            pointer: Mutex::new(pointer),
        }))
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        let closed = self.browser.close().await.map(|_| ()).map_err(protocol);
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process did not exit cleanly: {}", e);
        }
        self.handler_task.abort();
        closed
    }
}

struct ChromiumPage {
    page: Page,
    /// Last pointer position, where wheel events are dispatched.
    pointer: Mutex<(f64, f64)>,
}

impl ChromiumPage {
    async fn elements(&self, selector: &str) -> Result<Vec<Element>, EngineError> {
        match self.page.find_xpaths(selector).await {
            Ok(elements) => Ok(elements),
            Err(CdpError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(protocol(e)),
        }
    }

    async fn element(&self, locator: &Locator) -> Result<Element, EngineError> {
        self.elements(&locator.selector)
            .await?
            .into_iter()
            .nth(locator.index)
            .ok_or_else(|| EngineError::not_found(locator))
    }

    fn set_pointer(&self, x: f64, y: f64) {
        if let Ok(mut pointer) = self.pointer.lock() {
            *pointer = (x, y);
        }
    }

    fn pointer(&self) -> (f64, f64) {
        self.pointer.lock().map(|p| *p).unwrap_or((0.0, 0.0))
    }
}

#[async_trait]
impl PageDriver for ChromiumPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), EngineError> {
        info!("Navigating to {}", url);
        let nav_params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(|e| EngineError::Protocol(format!("Invalid URL: {}", e)))?;

        tokio::time::timeout(timeout, async {
            self.page.execute(nav_params).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, CdpError>(())
        })
        .await
        .map_err(|_| EngineError::timeout(format!("navigation to {}", url), timeout))?
        .map_err(protocol)
    }

    async fn count(&self, selector: &str) -> Result<usize, EngineError> {
        Ok(self.elements(selector).await?.len())
    }

    async fn inner_text(&self, locator: &Locator) -> Result<String, EngineError> {
        let element = self.element(locator).await?;
        Ok(element.inner_text().await.map_err(protocol)?.unwrap_or_default())
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), EngineError> {
        let element = self.element(locator).await?;
        element.scroll_into_view().await.map_err(protocol)?;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<(), EngineError> {
        let element = self.element(locator).await?;
        match element.clickable_point().await {
            Ok(point) => self.set_pointer(point.x, point.y),
            Err(e) => debug!("No clickable point for {}: {}", locator.selector, e),
        }
        element.click().await.map_err(protocol)?;
        Ok(())
    }

    async fn hover(&self, locator: &Locator) -> Result<(), EngineError> {
        let element = self.element(locator).await?;
        let point = element.clickable_point().await.map_err(protocol)?;
        let params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseMoved)
            .x(point.x)
            .y(point.y)
            .build()
            .map_err(EngineError::Protocol)?;
        self.page.execute(params).await.map_err(protocol)?;
        self.set_pointer(point.x, point.y);
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<(), EngineError> {
        debug!("Waiting for selector: {}", selector);
        tokio::time::timeout(timeout, async {
            loop {
                match self.count(selector).await {
                    Ok(n) if n > 0 => return,
                    Ok(_) => {}
                    Err(e) => warn!("Selector query failed, retrying: {}", e),
                }
                tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
            }
        })
        .await
        .map_err(|_| EngineError::timeout(selector, timeout))
    }

    async fn scroll_by(&self, dx: f64, dy: f64) -> Result<(), EngineError> {
        let (x, y) = self.pointer();
        let params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseWheel)
            .x(x)
            .y(y)
            .delta_x(dx)
            .delta_y(dy)
            .build()
            .map_err(EngineError::Protocol)?;
        self.page.execute(params).await.map_err(protocol)?;
        Ok(())
    }
}
