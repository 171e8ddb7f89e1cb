//! Spreadsheet reader (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`).

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{FileError, RowError, RowErrorKind};

use super::{NumberedRow, RawRow};

/// Read all rows of the first sheet of a workbook as raw-header → value maps.
///
/// Behavior:
///
/// - Uses the first sheet in the workbook.
/// - Detects the first non-empty row as the header row; header cells are stringified and trimmed.
/// - Rows carry their sheet-relative 1-based number (leading empty rows still count).
/// - Cell values are string-coerced (integral floats print without a trailing `.0`).
/// - Empty cells are absent from the row map; a `#VALUE!`-style error cell turns the whole row
///   into an inner [`RowError`].
pub fn read_excel_rows(path: impl AsRef<Path>) -> Result<Vec<NumberedRow>, FileError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| FileError::Malformed {
            message: "workbook has no sheets".to_string(),
        })?;
    let range = workbook.worksheet_range(&sheet)?;

    rows_from_range(&range)
}

fn rows_from_range(range: &calamine::Range<Data>) -> Result<Vec<NumberedRow>, FileError> {
    let (header_row_idx, headers) = find_header_row(range)?;

    // The range may not start at the sheet's first row; offset so numbers stay sheet-relative.
    let start_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);

    let mut rows: Vec<NumberedRow> = Vec::new();
    for (idx0, row) in range.rows().enumerate() {
        if idx0 <= header_row_idx {
            continue;
        }

        // Report 1-based row number (Excel-like).
        let user_row = start_row + idx0 + 1;
        rows.push(decode_row(user_row, &headers, row).map(|r| (user_row, r)));
    }

    Ok(rows)
}

fn find_header_row(range: &calamine::Range<Data>) -> Result<(usize, Vec<String>), FileError> {
    for (idx0, row) in range.rows().enumerate() {
        if row.iter().any(|c| !matches!(c, Data::Empty)) {
            let headers = row.iter().map(|c| cell_to_string(c).trim().to_string()).collect();
            return Ok((idx0, headers));
        }
    }
    Err(FileError::Malformed {
        message: "sheet has no non-empty rows (no header row found)".to_string(),
    })
}

fn decode_row(user_row: usize, headers: &[String], row: &[Data]) -> Result<RawRow, RowError> {
    let mut out = RawRow::with_capacity(headers.len());
    for (header, cell) in headers.iter().zip(row.iter()) {
        match cell {
            Data::Empty => {}
            Data::Error(e) => {
                return Err(RowError {
                    row: user_row,
                    kind: RowErrorKind::Malformed,
                    message: format!("error cell in column '{header}': {e:?}"),
                });
            }
            other => {
                out.insert(header.clone(), cell_to_string(other));
            }
        }
    }
    Ok(out)
}

/// String-coerce a cell. Integral floats print as integers so identifiers and postcodes stored
/// as numbers survive the round trip.
fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(f) => f.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}
