//! Browser executable discovery and launch flags.

use std::path::{Path, PathBuf};

use tracing::info;

use super::types::EngineError;

/// Common Chrome executable paths to check.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    // Windows
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    // Common install locations
    "/opt/google/chrome/google-chrome",
];

/// Names looked up in `PATH` when no known install path exists.
const CHROME_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Flags that keep Chrome usable inside containers and CI sandboxes.
pub const DEFAULT_CHROME_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-zygote",
    "--no-first-run",
    "--no-default-browser-check",
];

/// Resolve the browser binary to launch.
///
/// An explicitly configured path wins and must exist. Otherwise the common
/// install locations are probed, then `PATH`.
pub fn find_chrome(configured: Option<&Path>) -> Result<PathBuf, EngineError> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(EngineError::Launch(format!(
            "Configured browser not found: {}",
            path.display()
        )));
    }

    for path in CHROME_PATHS {
        let p = Path::new(path);
        if p.exists() {
            info!("Found Chrome at: {}", path);
            return Ok(p.to_path_buf());
        }
    }

    for cmd in CHROME_COMMANDS {
        if let Ok(path) = which::which(cmd) {
            info!("Found Chrome in PATH: {}", path.display());
            return Ok(path);
        }
    }

    Err(EngineError::Launch(
        "Chrome/Chromium not found. Please install it:\n\
         - Arch/Manjaro: sudo pacman -S chromium\n\
         - Ubuntu/Debian: sudo apt install chromium-browser\n\
         - Fedora: sudo dnf install chromium\n\
         - Or set browser.executable / --browser"
            .to_string(),
    ))
}

/// Default flags followed by user-supplied ones, without duplicates.
pub fn launch_args(extra: &[String]) -> Vec<String> {
    let mut args: Vec<String> = DEFAULT_CHROME_ARGS.iter().map(|a| a.to_string()).collect();
    for arg in extra {
        if !args.contains(arg) {
            args.push(arg.clone());
        }
    }
    args
}
