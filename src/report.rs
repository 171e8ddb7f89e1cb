//! Per-file outcomes and the run-level statistics report.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, RowErrorKind};

/// Terminal status of one processed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// All rows consumed, none failed.
    Success,
    /// All rows consumed; some rows failed, some transformed.
    Partial,
    /// File-level fatal error, every row failed, or the sink rejected the batch.
    Failed,
    /// No mapping entry for the filename, or an unsupported file type. No rows read.
    Skipped,
}

impl FileStatus {
    /// The report-facing name (`success`, `partial`, `failed`, `skipped`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The sealed statistics and status for one processed file.
///
/// Created when a file begins processing, mutated incrementally per row, sealed when the file's
/// rows are exhausted or a fatal file-level error occurs. Never mutated after sealing.
/// Invariant: `processed_rows + failed_rows == total_rows`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub total_rows: u64,
    pub processed_rows: u64,
    pub failed_rows: u64,
    pub status: FileStatus,
    /// Null unless the status is `failed` or `skipped`.
    pub error_message: Option<String>,
    /// Count of failed rows per distinct error kind. Bounded summary, not one entry per row.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub row_errors: BTreeMap<String, u64>,
    /// ISO-8601 timestamps bracketing the file's processing.
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl FileOutcome {
    /// A fresh, not-yet-sealed outcome.
    pub(crate) fn begin(start_time: DateTime<Utc>) -> Self {
        Self {
            total_rows: 0,
            processed_rows: 0,
            failed_rows: 0,
            status: FileStatus::Failed,
            error_message: None,
            row_errors: BTreeMap::new(),
            start_time,
            end_time: None,
        }
    }

    /// Sealed `skipped` outcome: no rows were read.
    pub(crate) fn sealed_skipped(start_time: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self {
            status: FileStatus::Skipped,
            error_message: Some(reason.into()),
            end_time: Some(Utc::now()),
            ..Self::begin(start_time)
        }
    }

    pub(crate) fn count_row_error(&mut self, kind: RowErrorKind) {
        self.failed_rows += 1;
        *self.row_errors.entry(kind.as_str().to_string()).or_default() += 1;
    }
}

/// Collects each file's [`FileOutcome`] into the overall run report.
///
/// Keys are filenames and unique per run; processing the same filename twice is last-write-wins
/// by design, not an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    #[serde(flatten)]
    outcomes: BTreeMap<String, FileOutcome>,
}

impl RunStats {
    /// Insert an outcome keyed by filename (last-write-wins).
    pub fn record(&mut self, filename: impl Into<String>, outcome: FileOutcome) {
        self.outcomes.insert(filename.into(), outcome);
    }

    /// All outcomes recorded so far, keyed by filename.
    pub fn outcomes(&self) -> &BTreeMap<String, FileOutcome> {
        &self.outcomes
    }

    /// Consume the aggregator, yielding the final filename -> outcome mapping.
    pub fn finalize(self) -> BTreeMap<String, FileOutcome> {
        self.outcomes
    }

    /// Whether any file sealed `failed` or `skipped` (drives the process exit status).
    pub fn has_failures(&self) -> bool {
        self.outcomes
            .values()
            .any(|o| matches!(o.status, FileStatus::Failed | FileStatus::Skipped))
    }

    /// Serialize the report as pretty-printed JSON keyed by filename.
    pub fn write_report(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(&self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
