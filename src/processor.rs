//! Per-file processing: drives row-by-row transformation, tallies counts, and hands sealed
//! batches to the warehouse sink.
//!
//! Each file moves through `Pending -> Running -> Sealed-{Success, Partial, Failed, Skipped}`.
//! Row-level failures are tolerated and counted, since a single malformed row must not discard an
//! otherwise-good file. File-level failures (no mapping, unreadable file, sink rejection)
//! are all-or-nothing so the warehouse never holds a partially-loaded, unauditable file.

use std::path::Path;

use chrono::Utc;

use crate::mapping::MappingRegistry;
use crate::reader::{self, FileFormat};
use crate::report::{FileOutcome, FileStatus, RunStats};
use crate::sink::WarehouseSink;
use crate::transform::RowTransformer;
use crate::types::CanonicalRecord;

/// Processes one file at a time against an immutable [`MappingRegistry`] and a sink.
///
/// Each call to [`FileProcessor::process`] owns its outcome and in-progress batch exclusively,
/// so processing different files concurrently is safe as long as the caller serializes
/// [`RunStats::record`].
pub struct FileProcessor<'a, S: WarehouseSink + ?Sized> {
    registry: &'a MappingRegistry,
    transformer: RowTransformer,
    sink: &'a S,
}

impl<'a, S: WarehouseSink + ?Sized> FileProcessor<'a, S> {
    /// Processor with the default NULL-token policy.
    pub fn new(registry: &'a MappingRegistry, sink: &'a S) -> Self {
        Self {
            registry,
            transformer: RowTransformer::new(),
            sink,
        }
    }

    /// Processor with a caller-provided transformer (custom NULL tokens).
    pub fn with_transformer(
        registry: &'a MappingRegistry,
        sink: &'a S,
        transformer: RowTransformer,
    ) -> Self {
        Self {
            registry,
            transformer,
            sink,
        }
    }

    /// Process one file to a sealed [`FileOutcome`].
    ///
    /// `filename` is the name used for registry lookup and as every record's `SourceFile`.
    pub fn process(&self, path: &Path, filename: &str) -> FileOutcome {
        let started = Utc::now();

        if FileFormat::from_path(path).is_none() {
            tracing::debug!(file = filename, "skipping: not a supported file type");
            return FileOutcome::sealed_skipped(started, "not a supported file type");
        }

        let Some(mapping) = self.registry.lookup(filename) else {
            tracing::warn!(file = filename, "skipping: no mapping configuration found");
            return FileOutcome::sealed_skipped(started, "no mapping configuration found");
        };

        // Pending -> Running.
        let mut outcome = FileOutcome::begin(started);
        let rows = match reader::read_rows(path) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(file = filename, error = %e, "file-level error");
                outcome.status = FileStatus::Failed;
                outcome.error_message = Some(e.to_string());
                outcome.end_time = Some(Utc::now());
                return outcome;
            }
        };

        let mut batch: Vec<CanonicalRecord> = Vec::new();
        let mut missing_columns_checked = false;
        for row in rows {
            match row {
                // The reader carries each row's 1-based source number.
                Ok((row_number, raw_row)) => {
                    if !missing_columns_checked {
                        // Mapped columns absent from the source are logged once per file,
                        // never per row.
                        missing_columns_checked = true;
                        for (raw_header, field) in &mapping.columns {
                            if !raw_row.contains_key(raw_header) {
                                tracing::warn!(
                                    file = filename,
                                    column = raw_header.as_str(),
                                    target = field.name(),
                                    "mapped column not found in source; field will be null"
                                );
                            }
                        }
                    }
                    match self
                        .transformer
                        .transform(row_number, &raw_row, mapping, filename)
                    {
                        Ok(record) => {
                            outcome.processed_rows += 1;
                            batch.push(record);
                        }
                        Err(e) => {
                            tracing::debug!(file = filename, error = %e, "row dropped");
                            outcome.count_row_error(e.kind);
                        }
                    }
                }
                Err(e) => {
                    tracing::debug!(file = filename, error = %e, "row dropped");
                    outcome.count_row_error(e.kind);
                }
            }
        }
        outcome.total_rows = outcome.processed_rows + outcome.failed_rows;

        // Running -> Sealed.
        if outcome.failed_rows == 0 {
            outcome.status = FileStatus::Success;
        } else if outcome.processed_rows > 0 {
            outcome.status = FileStatus::Partial;
        } else {
            // Every row failed: nothing to load, seal as failed.
            outcome.status = FileStatus::Failed;
            outcome.error_message =
                Some(format!("all {} rows failed transformation", outcome.failed_rows));
        }

        if matches!(outcome.status, FileStatus::Success | FileStatus::Partial)
            && !batch.is_empty()
        {
            match self.sink.load_batch(filename, &batch) {
                Ok(loaded) => {
                    tracing::info!(file = filename, rows = loaded, "batch loaded");
                }
                Err(e) => {
                    // Sink rejection demotes the whole file, even if rows transformed cleanly.
                    tracing::warn!(file = filename, error = %e, "warehouse load failed");
                    outcome.status = FileStatus::Failed;
                    outcome.error_message = Some(e.to_string());
                }
            }
        }

        outcome.end_time = Some(Utc::now());
        tracing::debug!(
            file = filename,
            status = ?outcome.status,
            total = outcome.total_rows,
            processed = outcome.processed_rows,
            failed = outcome.failed_rows,
            "sealed"
        );
        outcome
    }
}

/// Process every regular file in `directory` (non-recursive, listing order) and collect the
/// per-file outcomes into a [`RunStats`].
///
/// Only an unreadable directory aborts the run; every file-level problem is contained in its
/// outcome and the run continues to the next file.
pub fn process_directory<S: WarehouseSink + ?Sized>(
    directory: &Path,
    registry: &MappingRegistry,
    sink: &S,
) -> Result<RunStats, std::io::Error> {
    let processor = FileProcessor::new(registry, sink);
    let mut stats = RunStats::default();

    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().into_owned();
        let span = tracing::info_span!("file", name = %filename);
        let _guard = span.enter();
        let outcome = processor.process(&entry.path(), &filename);
        stats.record(filename, outcome);
    }

    Ok(stats)
}
