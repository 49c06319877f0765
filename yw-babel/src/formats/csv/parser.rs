//! CSV parsing
//!
//! Rows are read without header handling; the heading row carries no element ID and is skipped
//! by the list reader. Tabs inside a field stand for line breaks.

use crate::common::markup::CSV_LINEBREAK;
use crate::error::FormatError;
use crate::formats::common::table::{read_rows, ListKind};
use crate::model::Project;
use csv::StringRecord;

fn csv_error(err: csv::Error) -> FormatError {
    let row = err.position().map(|p| p.record() + 1).unwrap_or_default();
    FormatError::ParseError(format!("cannot parse CSV row {row}: {err}"))
}

/// All rows of `source`, line breaks restored.
pub fn csv_rows(source: &[u8]) -> Result<Vec<Vec<String>>, FormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);
    let mut record = StringRecord::new();
    let mut rows = Vec::new();
    while reader.read_record(&mut record).map_err(csv_error)? {
        rows.push(
            record
                .iter()
                .map(|field| field.replace(CSV_LINEBREAK, "\n"))
                .collect(),
        );
    }
    Ok(rows)
}

/// Read one list from a CSV file.
pub fn parse_from_csv(list: ListKind, source: &[u8]) -> Result<Project, FormatError> {
    read_rows(list, &csv_rows(source)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_fields_and_line_breaks() {
        let rows = csv_rows(b"\"ID\",\"Name\"\n\"LcID:1\",\"Big \"\"Cave\"\"\tdeep\"\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["LcID:1", "Big \"Cave\"\ndeep"]);
    }

    #[test]
    fn test_short_row_is_rejected() {
        let source = b"\"ID\",\"Name\",\"Description\",\"Aka\",\"Tags\"\n\"LcID:1\",\"Cave\"\n";
        let err = parse_from_csv(ListKind::Locations, source).unwrap_err();
        assert!(matches!(err, FormatError::ParseError(ref m) if m.contains("Wrong table structure")));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = csv_rows(b"\"a\",\"\xff\"\n").unwrap_err();
        assert!(matches!(err, FormatError::ParseError(_)));
    }
}
