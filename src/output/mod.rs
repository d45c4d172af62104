//! Output sinks for scraped places.
//!
//! A sink writes records to a file whose format follows the extension:
//! `.xlsx` gets a spreadsheet, anything else CSV. In append mode the
//! existing file is read back and merged, keeping the first record per name.

mod delimited;
mod spreadsheet;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::models::Place;

pub use spreadsheet::{column_widths, ADDRESS_COLUMN_WIDTH, SHEET_NAME};

/// Errors raised while writing output.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Spreadsheet read error: {0}")]
    XlsxRead(String),
}

/// File format, inferred from the output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Self::Xlsx,
            _ => Self::Csv,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// What a save did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing to write; the file was left untouched.
    NoData,
    Saved {
        path: PathBuf,
        format: OutputFormat,
        /// Unique records now in the file.
        records: usize,
    },
}

/// Something that persists places.
pub trait OutputSink {
    fn save(&self, places: &[Place], path: &Path, append: bool) -> Result<SaveOutcome, SinkError>;
}

/// Writes CSV or XLSX files on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSink;

impl FileSink {
    pub fn new() -> Self {
        Self
    }

    fn read_existing(&self, path: &Path, format: OutputFormat) -> Result<Vec<Place>, SinkError> {
        match format {
            OutputFormat::Csv => delimited::read_places(path),
            OutputFormat::Xlsx => spreadsheet::read_places(path),
        }
    }
}

impl OutputSink for FileSink {
    fn save(&self, places: &[Place], path: &Path, append: bool) -> Result<SaveOutcome, SinkError> {
        if places.is_empty() {
            return Ok(SaveOutcome::NoData);
        }

        let format = OutputFormat::from_path(path);
        let records = if append && path.exists() {
            match self.read_existing(path, format) {
                Ok(existing) => merge_unique(existing, places),
                Err(e) => {
                    warn!(
                        "Could not read existing {}, writing new records only: {}",
                        path.display(),
                        e
                    );
                    places.to_vec()
                }
            }
        } else {
            places.to_vec()
        };

        match format {
            OutputFormat::Csv => delimited::write_places(path, &records)?,
            OutputFormat::Xlsx => spreadsheet::write_places(path, &records)?,
        }

        Ok(SaveOutcome::Saved {
            path: path.to_path_buf(),
            format,
            records: records.len(),
        })
    }
}

/// Existing records followed by new ones, keeping the first record per name.
pub fn merge_unique(existing: Vec<Place>, new: &[Place]) -> Vec<Place> {
    let mut seen = HashSet::new();
    existing
        .into_iter()
        .chain(new.iter().cloned())
        .filter(|place| seen.insert(place.name.clone()))
        .collect()
}
