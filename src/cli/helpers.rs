//! Shared helper functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar counting accepted places, showing the latest name.
pub fn progress_bar(target: usize) -> ProgressBar {
    let progress = ProgressBar::new(target as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
        .map(|s| s.progress_chars("█▓░"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress.set_message("Opening search...");
    progress
}
