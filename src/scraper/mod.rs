//! Map search scraping: listing discovery, field extraction and the run loop.

mod dedup;
mod discovery;
mod error;
mod extract;
mod orchestrator;
pub mod selectors;

pub use dedup::Deduplicator;
pub use discovery::ListingDiscoverer;
pub use error::ScrapeError;
pub use extract::{
    apply_info_fragment, parse_opens_at, parse_reviews_average, parse_reviews_count,
    FieldExtractor,
};
pub use orchestrator::{ProgressCallback, ScrapeOrchestrator, ScrapeReport};
