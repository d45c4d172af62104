//! Errors that abort a scrape run.

use thiserror::Error;

use crate::browser::EngineError;

/// Fatal scrape errors. Per-field and per-listing failures never surface here.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Browser launch failed: {0}")]
    Launch(#[source] EngineError),

    #[error("Could not open search page {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: EngineError,
    },

    #[error("No listings appeared for the search: {0}")]
    NoListings(#[source] EngineError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
