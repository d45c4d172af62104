//! XLSX reading and writing.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;

use super::SinkError;
use crate::models::Place;

pub const SHEET_NAME: &str = "Sheet1";

/// Addresses are long and wrap; their column gets a fixed width.
pub const ADDRESS_COLUMN_WIDTH: f64 = 25.0;

const COLUMN_PADDING: usize = 2;

/// Read places from the first sheet of a workbook with a header row.
pub fn read_places(path: &Path) -> Result<Vec<Place>, SinkError> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e: calamine::XlsxError| SinkError::XlsxRead(e.to_string()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SinkError::XlsxRead("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| SinkError::XlsxRead(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(cell_text).collect(),
        None => return Ok(Vec::new()),
    };

    Ok(rows
        .map(|row| {
            Place::from_cells(
                headers
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(cell_text)),
            )
        })
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Write places to `path` as a single-sheet workbook with sized columns.
pub fn write_places(path: &Path, places: &[Place]) -> Result<(), SinkError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in Place::COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, place) in places.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, (column, text)) in Place::COLUMNS.iter().zip(place.to_record()).enumerate() {
            let col = col as u16;
            match *column {
                "reviews_count" => {
                    if let Some(count) = place.reviews_count {
                        worksheet.write_number(row, col, count as f64)?;
                    }
                }
                "reviews_average" => {
                    if let Some(average) = place.reviews_average {
                        worksheet.write_number(row, col, average)?;
                    }
                }
                _ if !text.is_empty() => {
                    worksheet.write_string(row, col, text)?;
                }
                _ => {}
            }
        }
    }

    for (col, width) in column_widths(places).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Column widths: the longer of the header and the longest value, plus
/// padding. The address column is fixed at [`ADDRESS_COLUMN_WIDTH`].
pub fn column_widths(places: &[Place]) -> Vec<f64> {
    let records: Vec<Vec<String>> = places.iter().map(Place::to_record).collect();

    Place::COLUMNS
        .iter()
        .enumerate()
        .map(|(col, header)| {
            if header.eq_ignore_ascii_case("address") {
                return ADDRESS_COLUMN_WIDTH;
            }
            let longest = records
                .iter()
                .map(|r| r[col].chars().count())
                .max()
                .unwrap_or(0);
            (longest.max(header.chars().count()) + COLUMN_PADDING) as f64
        })
        .collect()
}
