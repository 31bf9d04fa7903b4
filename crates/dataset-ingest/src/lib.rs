//! CSV ingest for the company listing dataset.
//!
//! Every cell is handed to the record store as text; cleaning (coordinate
//! validation, website normalisation) happens there, not here. This crate only
//! fails on problems with the file itself.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::anyhow;
use atlas_core::record::{RawRow, RawValue, columns};
use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

mod types;

pub use types::IngestError;

/// Read every row of the dataset at `path`.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_rows_from_reader(BufReader::new(file), &path.display().to_string())?;
    info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read rows from any CSV source; `source_name` only labels errors.
pub fn read_rows_from_reader<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<RawRow>, IngestError> {
    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| IngestError::Csv {
            source_name: source_name.to_string(),
            source,
        })?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect::<Vec<_>>();

    if headers.iter().all(|header| header.is_empty()) {
        return Err(IngestError::Other(anyhow!(
            "dataset {source_name} has no header row"
        )));
    }

    let missing: Vec<String> = columns::ALL
        .iter()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            source_name: source_name.to_string(),
            missing,
        });
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            source_name: source_name.to_string(),
            source,
        })?;
        if record.len() != headers.len() {
            debug!(
                line = record.position().map(|p| p.line()).unwrap_or_default(),
                fields = record.len(),
                expected = headers.len(),
                "row width differs from header"
            );
        }
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), RawValue::from_cell(cell)))
            .collect::<RawRow>();
        rows.push(row);
    }
    Ok(rows)
}
