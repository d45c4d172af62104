//! Value types shared by every browser engine.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Page viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// The `index`-th match of an XPath selector on the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    pub selector: String,
    pub index: usize,
}

impl Locator {
    pub fn first(selector: impl Into<String>) -> Self {
        Self::nth(selector, 0)
    }

    pub fn nth(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }
}

/// How to start a browser process.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Browser binary. Discovered automatically when `None`.
    pub executable: Option<PathBuf>,
    pub headless: bool,
    /// Extra command-line flags, appended after the defaults.
    pub args: Vec<String>,
}

/// Errors raised by a browser engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Timed out after {}s waiting for {what}", .after.as_secs())]
    Timeout { what: String, after: Duration },

    #[error("No element matches {selector} at index {index}")]
    NotFound { selector: String, index: usize },

    #[error("Browser protocol error: {0}")]
    Protocol(String),
}

impl EngineError {
    pub fn timeout(what: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            what: what.into(),
            after,
        }
    }

    pub fn not_found(locator: &Locator) -> Self {
        Self::NotFound {
            selector: locator.selector.clone(),
            index: locator.index,
        }
    }
}
