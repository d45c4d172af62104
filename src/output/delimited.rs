//! CSV reading and writing.

use std::path::Path;

use super::SinkError;
use crate::models::Place;

/// Read places from a CSV file with a header row.
pub fn read_places(path: &Path) -> Result<Vec<Place>, SinkError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut places = Vec::new();
    for row in reader.records() {
        let row = row?;
        places.push(Place::from_cells(
            headers.iter().zip(row.iter().map(str::to_string)),
        ));
    }
    Ok(places)
}

/// Write places to `path`, replacing any existing file.
pub fn write_places(path: &Path, places: &[Place]) -> Result<(), SinkError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(Place::COLUMNS)?;
    for place in places {
        writer.write_record(place.to_record())?;
    }
    writer.flush()?;
    Ok(())
}
