//! CSV corpus reader.
//!
//! Parses the historical exam-question corpus into `RawRecord`s. Column
//! headers map directly to field names; an empty cell deserializes to None.
//! Input problems are reported as typed errors, never a panic, so the entry
//! point can turn them into a structured failure outcome.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::domain::models::RawRecord;

/// Errors raised while reading a corpus file
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read corpus: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
}

/// Read a corpus CSV file into raw records.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>, CorpusError> {
    if !path.exists() {
        return Err(CorpusError::FileNotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    let records = read_records_from(file)?;
    info!(rows = records.len(), path = %path.display(), "loaded corpus");
    Ok(records)
}

/// Read corpus rows from any reader (e.g., an uploaded byte stream).
pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<RawRecord>, CorpusError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        let record: RawRecord = row?;
        records.push(record);
    }
    Ok(records)
}
