//! `warehouse-ingest` reshapes tabular files (CSV, spreadsheets) from a directory into a uniform
//! warehouse record set, driven by a per-file column/attribute mapping, and produces a per-file
//! processing report.
//!
//! The core is the mapping-and-transformation engine:
//!
//! - [`mapping::MappingRegistry`]: exact-filename lookup into immutable mapping definitions,
//!   built once from a YAML or JSON mapping file
//! - [`transform::RowTransformer`]: converts one raw row into a [`types::CanonicalRecord`]
//!   (fixed nullable columns plus ordered dynamic `{Key, Value}` attributes), owning the NULL
//!   policy and the attribute cap
//! - [`processor::FileProcessor`]: drives a whole file, tolerating and counting row-level
//!   failures while keeping file-level failures all-or-nothing, then hands the sealed batch to a
//!   [`sink::WarehouseSink`]
//! - [`report::RunStats`]: aggregates per-file [`report::FileOutcome`]s into the run report
//!
//! ## Quick example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use warehouse_ingest::mapping::MappingRegistry;
//! use warehouse_ingest::processor::process_directory;
//! use warehouse_ingest::sink::DryRunSink;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = MappingRegistry::from_path("mappings.yaml")?;
//! let stats = process_directory(Path::new("inbox"), &registry, &DryRunSink)?;
//! stats.write_report("processing_stats.json")?;
//! for (file, outcome) in stats.outcomes() {
//!     println!("{file}: {:?} ({} rows)", outcome.status, outcome.total_rows);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Mapping file
//!
//! Keyed by exact source filename; each entry maps raw headers to fixed canonical fields
//! (`columns`), to dynamic attribute keys (`attributes`), and tags records with a
//! `data_source`:
//!
//! ```yaml
//! contacts.csv:
//!   columns:
//!     fname: FirstName
//!     contact_email: Email
//!   attributes:
//!     tier: Tier
//!   data_source: crm_export
//! ```
//!
//! ## Modules
//!
//! - [`mapping`]: mapping-file loading, validation, and the filename registry
//! - [`reader`]: CSV and spreadsheet row readers
//! - [`transform`]: raw row -> canonical record
//! - [`processor`]: per-file state machine and the directory driver
//! - [`sink`]: warehouse sink seam plus dry-run and NDJSON staging implementations
//! - [`report`]: per-file outcomes and the JSON run report
//! - [`error`]: error types, one per containment level

pub mod error;
pub mod mapping;
pub mod processor;
pub mod reader;
pub mod report;
pub mod sink;
pub mod transform;
pub mod types;

pub use error::{ConfigError, FileError, ReportError, RowError, RowErrorKind, SinkError};
pub use mapping::{MappingDefinition, MappingRegistry};
pub use processor::{process_directory, FileProcessor};
pub use report::{FileOutcome, FileStatus, RunStats};
pub use sink::{DryRunSink, NdjsonFileSink, TableTarget, WarehouseSink};
pub use transform::{NullTokens, RowTransformer};
pub use types::{Attribute, CanonicalRecord, FixedField, MAX_ATTRIBUTES};
