//! placescout - map search listing scraper.
//!
//! The [`scraper`] module holds the run loop and depends only on the
//! [`browser`] capability traits; [`output`] persists the results.

pub mod browser;
pub mod config;
pub mod models;
pub mod output;
pub mod scraper;
