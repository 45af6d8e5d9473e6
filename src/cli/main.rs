//! csv-schema-cli: infer a PostgreSQL table from a delimited file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use csv_schema_sdk::cli::commands::infer::{InferArgs, handle_infer};

/// Infer column types and a primary key from a CSV file and write
/// DROP/CREATE/COPY statements to `<file>.sql`.
#[derive(Parser, Debug)]
#[command(name = "csv-schema-cli", version, about)]
struct Cli {
    /// Delimited file to inspect
    input: PathBuf,

    /// Schema that will hold the table
    schema: String,

    /// Table name (defaults to the file name up to its first '.')
    #[arg(long)]
    table_name: Option<String>,

    /// TOML file with inference settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// The first row is data, not column names
    #[arg(long)]
    no_header: bool,

    /// Field delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Quote character
    #[arg(long)]
    quote: Option<char>,

    /// Maximum number of data rows to sample (0 = all)
    #[arg(long)]
    sample_size: Option<usize>,

    /// Do not reject empty quoted strings
    #[arg(long)]
    skip_validation: bool,

    /// Add a PRIMARY KEY constraint for the detected key
    #[arg(long)]
    primary_key: bool,

    /// Print a per-column report (text, json, yaml)
    #[arg(long, value_name = "FORMAT")]
    report: Option<String>,

    /// Include engine events in json/yaml reports
    #[arg(long)]
    events: bool,

    /// Print the statements instead of writing the .sql file
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "csv_schema_sdk=warn",
        1 => "csv_schema_sdk=debug",
        _ => "csv_schema_sdk=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let args = InferArgs {
        input: cli.input,
        schema: cli.schema,
        table_name: cli.table_name,
        config_file: cli.config,
        no_header: cli.no_header,
        delimiter: cli.delimiter,
        quote: cli.quote,
        sample_size: cli.sample_size,
        skip_validation: cli.skip_validation,
        primary_key: cli.primary_key,
        report: cli.report,
        events: cli.events,
        dry_run: cli.dry_run,
    };

    handle_infer(&args)
        .with_context(|| format!("Failed to infer a table for {}", args.input.display()))
}
