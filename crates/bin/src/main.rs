//! Dataprep CLI binary.
//!
//! Runs JSON-configured preparation pipelines and inspects table files.

mod error;
mod inspect;

use clap::{Parser, Subcommand};
use dataprep::{FileFormat, PipelineConfig, PrepError, load_data};
use dataprep::features::registry::available_features;
use error::CliError;
use inspect::TableSummary;
use polars::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dataprep")]
#[command(about = "Dataprep: tabular data preparation for revenue forecasting", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pipeline described by a JSON config
    Run {
        /// Pipeline config file
        #[arg(long)]
        config: PathBuf,

        /// Write the result here instead of the configured output
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print a summary of the resulting table
        #[arg(long)]
        show: bool,
    },

    /// Show shape, schema and first rows of a table file
    Inspect {
        /// CSV or Excel file
        path: PathBuf,

        /// Reader to use (csv or excel); guessed from the extension when absent
        #[arg(long)]
        reader: Option<String>,

        /// Number of rows to print
        #[arg(long, default_value = "5")]
        rows: usize,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List available preparation steps
    Features {
        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            output,
            show,
        } => run_pipeline(&config, output, show)?,
        Commands::Inspect {
            path,
            reader,
            rows,
            format,
        } => inspect_file(&path, reader.as_deref(), rows, &format)?,
        Commands::Features { format } => list_features(&format)?,
    }

    Ok(())
}

fn run_pipeline(config_path: &Path, output: Option<PathBuf>, show: bool) -> Result<(), CliError> {
    let mut config = PipelineConfig::from_json_file(config_path)?;
    if output.is_some() {
        config.output = output;
    }

    tracing::info!(
        config = %config_path.display(),
        input = %config.input.path.display(),
        steps = config.steps.len(),
        "running pipeline"
    );

    let df = config.run()?;

    match &config.output {
        Some(path) => tracing::info!(
            rows = df.height(),
            columns = df.width(),
            output = %path.display(),
            "pipeline finished"
        ),
        None => tracing::info!(
            rows = df.height(),
            columns = df.width(),
            "pipeline finished without output"
        ),
    }

    if show {
        print!("{}", TableSummary::from_frame(&df).to_text());
    }

    Ok(())
}

fn resolve_reader(path: &Path, reader: Option<&str>) -> Result<FileFormat, PrepError> {
    match reader {
        Some(tag) => tag.parse(),
        None => FileFormat::from_extension(path)
            .ok_or_else(|| PrepError::UnsupportedFormat(path.display().to_string())),
    }
}

fn inspect_file(
    path: &Path,
    reader: Option<&str>,
    rows: usize,
    format: &str,
) -> Result<(), CliError> {
    let df = load_data(path, resolve_reader(path, reader)?)?;
    let summary = TableSummary::from_frame(&df);
    let head = df.head(Some(rows));

    if format == "json" {
        let mut value = summary.to_json();
        value["path"] = json!(path.display().to_string());
        value["head"] = json!(head_records(&head)?);
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", path.display());
        print!("{}", summary.to_text());
        println!();
        println!("{}", head);
    }

    Ok(())
}

/// First rows as a list of `{column: value}` objects, values rendered as text.
fn head_records(head: &DataFrame) -> Result<Vec<serde_json::Value>, CliError> {
    let mut records = Vec::with_capacity(head.height());
    for row in 0..head.height() {
        let mut record = serde_json::Map::new();
        for column in head.get_columns() {
            let value = match column.get(row)? {
                AnyValue::Null => serde_json::Value::Null,
                AnyValue::String(s) => json!(s),
                other => json!(other.to_string()),
            };
            record.insert(column.name().to_string(), value);
        }
        records.push(serde_json::Value::Object(record));
    }
    Ok(records)
}

fn list_features(format: &str) -> Result<(), CliError> {
    let features = available_features();

    if format == "json" {
        let value: Vec<_> = features
            .iter()
            .map(|f| {
                json!({
                    "name": f.name,
                    "description": f.description,
                    "required_columns": f.required_columns,
                    "produced_columns": f.produced_columns,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Available steps:");
    for feature in &features {
        println!("  {:<14} {}", feature.name, feature.description);
        if !feature.required_columns.is_empty() {
            println!("  {:<14} requires: {}", "", feature.required_columns.join(", "));
        }
        if !feature.produced_columns.is_empty() {
            println!("  {:<14} adds: {}", "", feature.produced_columns.join(", "));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inspect_defaults() {
        let cli = Cli::parse_from(["dataprep", "inspect", "sales.xlsx"]);
        let Commands::Inspect {
            path,
            reader,
            rows,
            format,
        } = cli.command
        else {
            panic!("expected inspect");
        };
        assert_eq!(path, PathBuf::from("sales.xlsx"));
        assert_eq!(reader, None);
        assert_eq!(rows, 5);
        assert_eq!(format, "text");
    }

    #[test]
    fn test_resolve_reader() {
        let path = Path::new("data/sales.xlsx");
        assert_eq!(resolve_reader(path, None).unwrap(), FileFormat::Excel);
        assert_eq!(resolve_reader(path, Some("csv")).unwrap(), FileFormat::Csv);
        assert!(matches!(
            resolve_reader(Path::new("sales.parquet"), None),
            Err(PrepError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            resolve_reader(path, Some("json")),
            Err(PrepError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_head_records() {
        let df = df!(
            "NGÀY" => [10i64, 11],
            "note" => [Some("busy"), None]
        )
        .unwrap();
        let records = head_records(&df).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["NGÀY"], "10");
        assert_eq!(records[0]["note"], "busy");
        assert!(records[1]["note"].is_null());
    }
}
