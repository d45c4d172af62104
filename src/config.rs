//! Configuration management for placescout.
//!
//! Settings are layered: built-in defaults, then a config file (explicit path
//! or auto-discovered), then environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::browser::BrowserEngineConfig;

/// Name `prefer` uses to discover config files (`placescout.toml`, ...).
pub const APP_NAME: &str = "placescout";

/// Search endpoint; `{query}` is replaced by the form-encoded search text.
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/maps/search/{query}";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Timeouts and settle delays for the scrape loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Initial navigation to the search page. Fatal when exceeded.
    pub navigation_timeout_secs: u64,
    /// Wait for the first listing to render. Fatal when exceeded.
    pub first_listing_timeout_secs: u64,
    /// Wait for a listing's detail view. Exceeding it skips the listing.
    pub detail_timeout_secs: u64,
    pub consent_settle_ms: u64,
    pub detail_settle_ms: u64,
    /// Pause after the discovery scroll.
    pub scroll_settle_ms: u64,
    /// Pause after the extra scroll when a cycle ends short of the target.
    pub retry_settle_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            navigation_timeout_secs: 120,
            first_listing_timeout_secs: 90,
            detail_timeout_secs: 30,
            consent_settle_ms: 5_000,
            detail_settle_ms: 2_000,
            scroll_settle_ms: 3_000,
            retry_settle_ms: 4_000,
        }
    }
}

impl Timings {
    /// All timeouts at one second and no settle delays.
    pub fn immediate() -> Self {
        Self {
            navigation_timeout_secs: 1,
            first_listing_timeout_secs: 1,
            detail_timeout_secs: 1,
            consent_settle_ms: 0,
            detail_settle_ms: 0,
            scroll_settle_ms: 0,
            retry_settle_ms: 0,
        }
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn first_listing_timeout(&self) -> Duration {
        Duration::from_secs(self.first_listing_timeout_secs)
    }

    pub fn detail_timeout(&self) -> Duration {
        Duration::from_secs(self.detail_timeout_secs)
    }

    pub fn consent_settle(&self) -> Duration {
        Duration::from_millis(self.consent_settle_ms)
    }

    pub fn detail_settle(&self) -> Duration {
        Duration::from_millis(self.detail_settle_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn retry_settle(&self) -> Duration {
        Duration::from_millis(self.retry_settle_ms)
    }
}

/// Scrape loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Search URL template containing `{query}`.
    pub search_url: String,
    pub timings: Timings,
    /// Wheel distance used while discovering more listings.
    pub discover_scroll_px: f64,
    /// Wheel distance used when a cycle ends short of the target.
    pub retry_scroll_px: f64,
    /// Listings to keep rendered beyond the target, to absorb failures.
    pub overscan: usize,
    /// Consecutive cycles without new listings before giving up (0 = never).
    pub max_stalled_cycles: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            timings: Timings::default(),
            discover_scroll_px: 5_000.0,
            retry_scroll_px: 10_000.0,
            overscan: 2,
            max_stalled_cycles: 5,
        }
    }
}

impl ScrapeConfig {
    /// Build the search URL for `query`, encoding spaces as `+`.
    pub fn search_url_for(&self, query: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        if self.search_url.contains("{query}") {
            self.search_url.replace("{query}", &encoded)
        } else {
            format!("{}/{}", self.search_url.trim_end_matches('/'), encoded)
        }
    }
}

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserEngineConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    /// File this config was loaded from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must load successfully. Without one, `prefer`
    /// discovers a `placescout` config file in the standard locations,
    /// falling back to defaults when none exists. Environment overrides are
    /// applied last in every case.
    pub async fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load_from_path(path).await?,
            None => match Self::discover().await {
                Some(path) => {
                    tracing::debug!("Using config file: {}", path.display());
                    Self::load_from_path(&path).await?
                }
                None => Self::default(),
            },
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file path.
    /// Supports TOML, YAML, and JSON based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let path = resolve_path(&path.to_string_lossy());
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        let parsed: Result<Config, String> = match ext {
            "json" => serde_json::from_str(&contents).map_err(|e| e.to_string()),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| e.to_string()),
            _ => toml::from_str(&contents).map_err(|e| e.to_string()),
        };

        let mut config = parsed.map_err(|message| ConfigError::Parse {
            path: path.clone(),
            message,
        })?;
        if let Some(executable) = config.browser.executable.take() {
            config.browser.executable = Some(resolve_path(&executable.to_string_lossy()));
        }
        config.source_path = Some(path);
        Ok(config)
    }

    /// Find a config file with `prefer`; parsing stays with serde.
    async fn discover() -> Option<PathBuf> {
        match prefer::load(APP_NAME).await {
            Ok(found) => found.source_path().map(|p| p.to_path_buf()),
            Err(e) => {
                tracing::debug!("No config file discovered: {}", e);
                None
            }
        }
    }

    /// Apply `PLACESCOUT_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        if let Some(browser) = env_var("PLACESCOUT_BROWSER") {
            tracing::debug!("Using PLACESCOUT_BROWSER from environment: {}", browser);
            self.browser.executable = Some(resolve_path(&browser));
        }

        if let Some(headless) = env_var("PLACESCOUT_HEADLESS") {
            self.browser.headless = !matches!(
                headless.to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }

        if let Some(url) = env_var("PLACESCOUT_SEARCH_URL") {
            tracing::debug!("Using PLACESCOUT_SEARCH_URL from environment: {}", url);
            self.scrape.search_url = url;
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Expand `~` and return the path.
fn resolve_path(path_str: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path_str).as_ref())
}
