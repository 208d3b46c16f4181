//! Census table loading.
//!
//! The census file is a CSV whose first row holds the date labels and
//! whose first column holds the nest labels. Every other field is a cell
//! listing the wasps seen on that nest on that date.

pub mod reader;

use crate::error::CensusError;
use crate::models::{CensusTable, Cell};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Read and parse a census file.
pub fn load_census(path: &Path, empty_markers: &[String]) -> Result<CensusTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read census file: {}", path.display()))?;

    let table = parse_census(&content, empty_markers)
        .with_context(|| format!("Failed to parse census file: {}", path.display()))?;

    debug!(
        "Loaded census {}: {} nests x {} dates, {} observations",
        path.display(),
        table.nest_count(),
        table.date_count(),
        table.observation_count()
    );

    Ok(table)
}

/// Parse census CSV text.
pub fn parse_census(text: &str, empty_markers: &[String]) -> Result<CensusTable, CensusError> {
    let mut records = reader::read_records(text)?.into_iter();

    let header = records.next().ok_or(CensusError::MissingHeader)?;
    let width = header.fields.len();
    let dates: Vec<String> = header
        .fields
        .into_iter()
        .skip(1)
        .map(|d| d.trim().to_string())
        .collect();

    if dates.is_empty() {
        return Err(CensusError::NoDates);
    }

    let mut rows = Vec::new();
    for record in records {
        // Spreadsheet exports often end with rows of bare delimiters
        if record.fields.iter().all(|f| f.trim().is_empty()) {
            debug!("Skipping empty row at line {}", record.line);
            continue;
        }

        if record.fields.len() > width {
            return Err(CensusError::TooManyFields {
                line: record.line,
                expected: width,
                found: record.fields.len(),
            });
        }

        let mut fields = record.fields.into_iter();
        let nest = fields.next().unwrap_or_default().trim().to_string();
        if nest.is_empty() {
            return Err(CensusError::MissingNest { line: record.line });
        }

        let cells: Vec<Cell> = fields.map(|raw| Cell::parse(&raw, empty_markers)).collect();
        rows.push((nest, cells));
    }

    Ok(CensusTable::new(dates, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_empty_markers;
    use tempfile::TempDir;

    const SAMPLE: &str = include_str!("../../fixtures/wasp_census_sample.csv");

    #[test]
    fn test_parse_sample() {
        let table = parse_census(SAMPLE, &default_empty_markers()).unwrap();

        assert_eq!(table.nests(), &["N1", "N2", "N3", "N4"]);
        assert_eq!(table.dates(), &["6/3/2019", "6/4/2019", "6/5/2019"]);
        assert_eq!(table.observation_count(), 5);
        assert!(table.cell(0, 0).contains("W2"));
        assert!(table.cell(2, 2).is_empty());
        assert!(table.nest_row(3).iter().all(Cell::is_empty));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = parse_census("Nest,d1,d2\nN1,A\n", &default_empty_markers()).unwrap();
        assert_eq!(table.nest_row(0).len(), 2);
        assert!(table.cell(0, 1).is_empty());
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = parse_census("\n\n", &default_empty_markers()).unwrap_err();
        assert!(matches!(err, CensusError::MissingHeader));
    }

    #[test]
    fn test_header_without_dates() {
        let err = parse_census("Nest\nN1\n", &default_empty_markers()).unwrap_err();
        assert!(matches!(err, CensusError::NoDates));
    }

    #[test]
    fn test_too_many_fields() {
        let err = parse_census("Nest,d1\nN1,A,B\n", &default_empty_markers()).unwrap_err();
        assert!(matches!(
            err,
            CensusError::TooManyFields {
                line: 2,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_missing_nest_label() {
        let err = parse_census("Nest,d1\n,A\n", &default_empty_markers()).unwrap_err();
        assert!(matches!(err, CensusError::MissingNest { line: 2 }));
    }

    #[test]
    fn test_trailing_empty_rows_are_skipped() {
        let table =
            parse_census("Nest,d1,d2\nN1,\"A, B\",A\n,,\n,,\n", &default_empty_markers())
                .unwrap();
        assert_eq!(table.nests(), &["N1"]);
        assert_eq!(table.observation_count(), 2);
    }

    #[test]
    fn test_blank_nest_with_sightings_is_still_an_error() {
        let err = parse_census("Nest,d1,d2\nN1,A,\n,,B\n", &default_empty_markers())
            .unwrap_err();
        assert!(matches!(err, CensusError::MissingNest { line: 3 }));
    }

    #[test]
    fn test_mac_line_endings() {
        let table =
            parse_census("Nest,d1,d2\rN1,\"A, B\",A\rN2,B,\r", &default_empty_markers())
                .unwrap();
        assert_eq!(table.nests(), &["N1", "N2"]);
        assert_eq!(table.dates(), &["d1", "d2"]);
        assert!(table.cell(0, 0).contains("B"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_census(&temp_dir.path().join("nope.csv"), &default_empty_markers())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read census file"));
    }

    #[test]
    fn test_load_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("census.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let table = load_census(&path, &default_empty_markers()).unwrap();
        assert_eq!(table.nest_count(), 4);
    }
}
