//! CSV reader.

use std::path::Path;

use crate::error::{FileError, RowError, RowErrorKind};

use super::{NumberedRow, RawRow};

/// Read all rows of a CSV file as raw-header → value maps.
///
/// Rules:
///
/// - The CSV must have a header row; header names are trimmed.
/// - Rows are numbered 1-based with the header as row 1, and the number is carried with each
///   decoded row.
/// - A record the `csv` crate cannot decode (ragged row, invalid UTF-8) becomes an inner
///   [`RowError`] and reading continues with the next record.
pub fn read_csv_rows(path: impl AsRef<Path>) -> Result<Vec<NumberedRow>, FileError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    read_csv_rows_from_reader(&mut rdr)
}

/// Read rows from an existing CSV reader.
pub fn read_csv_rows_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> Result<Vec<NumberedRow>, FileError> {
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut rows: Vec<NumberedRow> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because the header is row 1.
        let user_row = row_idx0 + 2;
        match result {
            Ok(record) => {
                let mut row = RawRow::with_capacity(headers.len());
                for (header, value) in headers.iter().zip(record.iter()) {
                    row.insert(header.clone(), value.to_string());
                }
                rows.push(Ok((user_row, row)));
            }
            Err(e) => rows.push(Err(RowError {
                row: user_row,
                kind: RowErrorKind::Malformed,
                message: e.to_string(),
            })),
        }
    }

    Ok(rows)
}
