use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use warehouse_ingest::mapping::MappingRegistry;
use warehouse_ingest::processor::process_directory;
use warehouse_ingest::sink::{DryRunSink, NdjsonFileSink, TableTarget, WarehouseSink};

/// Process mapped CSV/spreadsheet files and stage them for a warehouse table.
#[derive(Parser, Debug)]
#[command(name = "warehouse-ingest", version, about)]
struct Cli {
    /// Directory containing the files to process
    #[arg(long)]
    directory: PathBuf,

    /// YAML/JSON file containing column mappings
    #[arg(long)]
    mapping_file: PathBuf,

    /// Warehouse project ID
    #[arg(long)]
    project_id: Option<String>,

    /// Warehouse dataset ID
    #[arg(long)]
    dataset_id: Option<String>,

    /// Warehouse table ID
    #[arg(long)]
    table_id: Option<String>,

    /// Output file for processing statistics
    #[arg(long, default_value = "processing_stats.json")]
    output_file: PathBuf,

    /// Directory where load-ready NDJSON batches are staged
    #[arg(long, default_value = ".")]
    staging_dir: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let registry = MappingRegistry::from_path(&cli.mapping_file)
        .with_context(|| format!("loading mapping file {}", cli.mapping_file.display()))?;

    // A fully specified project/dataset/table enables the load step; anything less is an
    // explicit dry run where transformation and the report still happen.
    let target = TableTarget::from_parts(cli.project_id, cli.dataset_id, cli.table_id);
    let sink: Box<dyn WarehouseSink> = match &target {
        Some(target) => {
            tracing::info!(table = %target.qualified_name(), "staging batches for load");
            Box::new(NdjsonFileSink::for_target(&cli.staging_dir, target))
        }
        None => {
            tracing::warn!("warehouse target incomplete; load step disabled (dry run)");
            Box::new(DryRunSink)
        }
    };

    let stats = process_directory(&cli.directory, &registry, sink.as_ref())
        .with_context(|| format!("reading directory {}", cli.directory.display()))?;

    stats
        .write_report(&cli.output_file)
        .with_context(|| format!("writing report to {}", cli.output_file.display()))?;

    println!("\nProcessing Summary:");
    for (filename, outcome) in stats.outcomes() {
        println!("\nFile: {filename}");
        println!("Status: {}", outcome.status);
        println!("Total rows: {}", outcome.total_rows);
        println!("Processed rows: {}", outcome.processed_rows);
        println!("Failed rows: {}", outcome.failed_rows);
        if let Some(message) = &outcome.error_message {
            println!("Error: {message}");
        }
    }

    if stats.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
