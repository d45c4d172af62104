//! Browser engine configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::types::{LaunchOptions, Viewport};

/// Browser engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Path to the Chrome/Chromium binary. Auto-discovered when unset.
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// Run in headless mode (default: true).
    /// Set to false to watch the scrape in a visible window.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// Viewport width in pixels.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    /// Viewport height in pixels.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            executable: None,
            headless: default_headless(),
            chrome_args: Vec::new(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

impl BrowserEngineConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
        }
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            executable: self.executable.clone(),
            headless: self.headless,
            args: self.chrome_args.clone(),
        }
    }
}

pub fn default_headless() -> bool {
    true
}

pub fn default_viewport_width() -> u32 {
    Viewport::default().width
}

pub fn default_viewport_height() -> u32 {
    Viewport::default().height
}
