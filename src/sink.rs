//! Warehouse sink: accepts a finished batch of canonical records for one file.
//!
//! The real warehouse client (authentication, load jobs) is an external collaborator; this
//! module defines the seam plus two local implementations. Whatever the implementation, the
//! sink owns stamping `BQInsertedDate` at load time; the transformation engine never sets it.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::SinkError;
use crate::types::CanonicalRecord;

/// Destination table identifiers, as passed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableTarget {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

impl TableTarget {
    /// A target only exists when all three identifiers are present; anything less means the
    /// load step is disabled (dry run).
    pub fn from_parts(
        project_id: Option<String>,
        dataset_id: Option<String>,
        table_id: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            project_id: project_id?,
            dataset_id: dataset_id?,
            table_id: table_id?,
        })
    }

    /// Fully-qualified `project.dataset.table` name.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }
}

/// Durable destination for sealed per-file batches.
///
/// One call per file; the batch is all-or-nothing. A rejection converts the file's outcome to
/// `failed` even if every row transformed cleanly.
pub trait WarehouseSink {
    /// Load one batch. Returns the number of rows loaded.
    fn load_batch(
        &self,
        source_file: &str,
        batch: &[CanonicalRecord],
    ) -> Result<usize, SinkError>;
}

/// Counts and discards batches. Used whenever the warehouse target is incomplete.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSink;

impl WarehouseSink for DryRunSink {
    fn load_batch(
        &self,
        source_file: &str,
        batch: &[CanonicalRecord],
    ) -> Result<usize, SinkError> {
        tracing::info!(file = source_file, rows = batch.len(), "dry run: load step disabled");
        Ok(batch.len())
    }
}

/// Appends load-ready JSON rows to a local newline-delimited staging file.
///
/// Each row is the canonical record's warehouse JSON shape with `BQInsertedDate` stamped at
/// load time, i.e. exactly what a warehouse load job consumes. A batch is appended with a
/// single write: if staging fails, no row of the batch reaches the file.
#[derive(Debug, Clone)]
pub struct NdjsonFileSink {
    path: PathBuf,
}

impl NdjsonFileSink {
    /// Sink appending to an explicit file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Sink staging under `dir`, named after the fully-qualified table.
    pub fn for_target(dir: impl AsRef<Path>, target: &TableTarget) -> Self {
        Self::new(dir.as_ref().join(format!("{}.ndjson", target.qualified_name())))
    }

    /// The staging file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WarehouseSink for NdjsonFileSink {
    fn load_batch(
        &self,
        source_file: &str,
        batch: &[CanonicalRecord],
    ) -> Result<usize, SinkError> {
        let inserted = Utc::now();

        // Serialize the whole batch before touching the file, then append it in one write, so
        // a mid-batch failure cannot leave a partially staged batch behind.
        let mut buf: Vec<u8> = Vec::new();
        for record in batch {
            let row = load_row(record, inserted)?;
            serde_json::to_writer(&mut buf, &row)?;
            buf.push(b'\n');
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(&buf)?;
        tracing::debug!(
            file = source_file,
            rows = batch.len(),
            staging = %self.path.display(),
            "staged batch"
        );
        Ok(batch.len())
    }
}

/// Serialize one canonical record as a warehouse load row, stamping `BQInsertedDate`.
pub fn load_row(
    record: &CanonicalRecord,
    inserted: DateTime<Utc>,
) -> Result<serde_json::Value, SinkError> {
    let mut row = serde_json::to_value(record)?;
    if let serde_json::Value::Object(map) = &mut row {
        map.insert(
            "BQInsertedDate".to_string(),
            serde_json::Value::String(inserted.to_rfc3339()),
        );
    }
    Ok(row)
}
