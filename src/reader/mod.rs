//! File readers: stream rows of a CSV or spreadsheet file as raw-header → raw-value maps.
//!
//! The mapping engine is agnostic to the source format once rows are produced. Readers make a
//! two-level distinction:
//!
//! - a file that cannot be opened or has no usable structure is a [`FileError`] (the whole file
//!   seals `failed`)
//! - a single row that cannot be decoded is an inner [`RowError`] in the returned row list (the
//!   row is counted as failed and the file keeps processing)

pub mod csv;
pub mod excel;

use std::collections::HashMap;
use std::path::Path;

use crate::error::{FileError, RowError};

/// One raw source row: raw header name -> string-coerced cell value.
///
/// Absent cells are simply missing keys; readers do not invent empty-string entries for them.
pub type RawRow = HashMap<String, String>;

/// One decoded row: the 1-based source row number plus the row map, or a [`RowError`].
///
/// The reader owns the numbering (CSV counts the header as row 1; spreadsheets use sheet-relative
/// numbers, so leading empty rows still count), and the same number flows into every error
/// message about that row.
pub type NumberedRow = Result<(usize, RawRow), RowError>;

/// Supported source-file formats, selected by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values (`.csv`).
    Csv,
    /// Spreadsheet/workbook formats (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`).
    Excel,
}

impl FileFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Parse a format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

/// Read all rows of a supported file, dispatching on the extension.
pub fn read_rows(path: &Path) -> Result<Vec<NumberedRow>, FileError> {
    match FileFormat::from_path(path) {
        Some(FileFormat::Csv) => csv::read_csv_rows(path),
        Some(FileFormat::Excel) => excel::read_excel_rows(path),
        None => Err(FileError::Malformed {
            message: format!("not a supported file type ({})", path.display()),
        }),
    }
}
