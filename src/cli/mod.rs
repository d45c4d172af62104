//! Command-line interface.

mod helpers;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use console::style;

use placescout::browser::ChromiumEngine;
use placescout::config::Config;
use placescout::models::Place;
use placescout::output::{FileSink, OutputSink, SaveOutcome};
use placescout::scraper::ScrapeOrchestrator;

#[derive(Parser)]
#[command(name = "placescout")]
#[command(about = "Scrape place listings from a map search")]
#[command(version)]
pub struct Cli {
    /// Search query
    #[arg(short, long, default_value = "turkish stores in toronto Canada")]
    search: String,

    /// Number of unique places to collect
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    total: u64,

    /// Output file (.csv or .xlsx)
    #[arg(short, long, default_value = "result.csv")]
    output: PathBuf,

    /// Merge into an existing output file instead of replacing it
    #[arg(long)]
    append: bool,

    /// Config file path (overrides auto-discovery)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Browser executable (overrides config, PLACESCOUT_BROWSER and auto-discovery)
    #[arg(long)]
    browser: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overlay command-line flags on the loaded configuration.
    fn apply_to(&self, config: &mut Config) {
        if let Some(browser) = &self.browser {
            config.browser.executable = Some(browser.clone());
        }
        if self.headed {
            config.browser.headless = false;
        }
    }
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Parse arguments, scrape, and save.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    cli.apply_to(&mut config);

    let target = usize::try_from(cli.total).context("--total is too large")?;

    println!(
        "{} Searching for {} ({} results)",
        style("→").cyan(),
        style(&cli.search).bold(),
        target
    );

    let progress = helpers::progress_bar(target);
    let progress_handle = progress.clone();

    let orchestrator = ScrapeOrchestrator::new(
        ChromiumEngine,
        config.browser.launch_options(),
        config.browser.viewport(),
        config.scrape.clone(),
    )
    .with_progress(Box::new(move |accepted: usize, _target: usize, place: &Place| {
        progress_handle.set_position(accepted as u64);
        progress_handle.set_message(place.name.clone());
    }));

    let report = orchestrator.run(&cli.search, target).await;
    progress.finish_and_clear();
    let report = report.context("Scrape failed")?;

    if !report.is_complete() {
        println!(
            "{} Listing feed ran dry: collected {} of {} ({} short)",
            style("!").yellow(),
            report.places.len(),
            report.target,
            report.shortfall()
        );
    }

    let outcome = FileSink::new()
        .save(&report.places, &cli.output, cli.append)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    match outcome {
        SaveOutcome::NoData => {
            println!("{} No data found.", style("✗").red());
        }
        SaveOutcome::Saved {
            path,
            format,
            records,
        } => {
            println!(
                "{} Saved {} unique records to {} ({})",
                style("✓").green(),
                records,
                path.display(),
                format.as_str()
            );
        }
    }

    Ok(())
}
