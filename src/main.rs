//! placescout - scrape place listings from a map search.
//!
//! Drives a headless Chrome through an infinite-scroll search feed, extracts
//! each listing's details and writes the unique results to CSV or XLSX.

mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(cli::is_verbose()).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Run CLI
    cli::run().await
}

/// Log filter used when `RUST_LOG` is unset. Quiet by default so log lines
/// don't tear through the progress bar.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "placescout=info"
    } else {
        "placescout=warn"
    }
}
