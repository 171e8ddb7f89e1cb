use thiserror::Error;

/// Fatal configuration problems.
///
/// A `ConfigError` aborts the whole run before any file is processed; every other error in this
/// crate is contained at the file or row level and recorded in the processing report instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O error reading the mapping file.
    #[error("io error reading mapping file: {0}")]
    Io(#[from] std::io::Error),

    /// The mapping file has an extension we do not parse.
    #[error("mapping file must be YAML or JSON ({path})")]
    UnsupportedFormat { path: String },

    /// YAML mapping file could not be parsed.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON mapping file could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A raw header appears in both `columns` and `attributes` of one definition.
    #[error("mapping for '{file}': header '{header}' appears in both columns and attributes")]
    OverlappingHeader { file: String, header: String },

    /// A `columns` entry targets something that is not a mappable fixed field.
    #[error("mapping for '{file}': '{target}' is not a mappable canonical field")]
    UnknownTarget { file: String, target: String },

    /// Two `columns` entries target the same fixed field.
    #[error("mapping for '{file}': canonical field '{target}' mapped more than once")]
    DuplicateTarget { file: String, target: String },
}

/// Classification of single-row transformation failures.
///
/// The per-file report aggregates a count per kind rather than one entry per failed row, so the
/// report stays bounded for large files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RowErrorKind {
    /// The reader could not decode the row (ragged record, invalid UTF-8, spreadsheet error cell).
    Malformed,
    /// The row would emit more dynamic attributes than the target schema allows.
    AttributeLimitExceeded,
}

impl RowErrorKind {
    /// Stable string used as the key in the per-file row-error summary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed_row",
            Self::AttributeLimitExceeded => "attribute_limit_exceeded",
        }
    }
}

/// A single-row failure. The row is dropped and counted; the file keeps processing.
#[derive(Debug, Clone, Error)]
#[error("row {row}: {message}")]
pub struct RowError {
    /// 1-based row number in the source file (the header is row 1).
    pub row: usize,
    /// Failure classification.
    pub kind: RowErrorKind,
    /// Human-readable reason.
    pub message: String,
}

/// A file-level fatal error.
///
/// Seals the file as `failed` and discards any partially accumulated batch; the run continues
/// with the next file.
#[derive(Debug, Error)]
pub enum FileError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet reader error.
    #[error("spreadsheet error: {0}")]
    Excel(#[from] calamine::Error),

    /// The file's structure is unusable (no sheets, no header row, unknown format).
    #[error("malformed file: {message}")]
    Malformed { message: String },
}

/// Error returned by a warehouse sink when a batch cannot be loaded.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Underlying I/O error writing the batch.
    #[error("io error writing batch: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized into a load row.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The warehouse rejected the batch.
    #[error("batch rejected: {message}")]
    Rejected { message: String },
}

/// Error writing the final processing report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Underlying I/O error.
    #[error("io error writing report: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization failed.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
