//! Infer command implementation

use std::path::PathBuf;

use crate::cli::error::CliError;
use crate::cli::output::{TableReport, format_report};
use crate::export::DdlGenerator;
use crate::inference::InferenceConfig;
use crate::models::Table;

/// Arguments for the `infer` command
pub struct InferArgs {
    /// Source file
    pub input: PathBuf,
    /// Target schema for the generated statements
    pub schema: String,
    /// Override the table name derived from the file name
    pub table_name: Option<String>,
    /// Optional TOML configuration file
    pub config_file: Option<PathBuf>,
    /// Overrides applied on top of the configuration file
    pub no_header: bool,
    pub delimiter: Option<char>,
    pub quote: Option<char>,
    pub sample_size: Option<usize>,
    pub skip_validation: bool,
    /// Append a PRIMARY KEY constraint to CREATE TABLE
    pub primary_key: bool,
    /// Report format (text, json, yaml); no report when `None`
    pub report: Option<String>,
    /// Include engine events in json/yaml reports
    pub events: bool,
    /// Print the statements instead of writing the sidecar file
    pub dry_run: bool,
}

impl InferArgs {
    /// Configuration file values with command-line overrides applied
    pub fn config(&self) -> Result<InferenceConfig, CliError> {
        let mut config = match &self.config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(CliError::FileReadError(
                        path.clone(),
                        "not a file".to_string(),
                    ));
                }
                InferenceConfig::from_toml_file(path)?
            }
            None => InferenceConfig::default(),
        };
        if self.no_header {
            config.has_header = false;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(quote) = self.quote {
            config.quote = quote;
        }
        if let Some(sample_size) = self.sample_size {
            config.sample_size = sample_size;
        }
        if self.skip_validation {
            config.validate_values = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Handle the `infer` command
pub fn handle_infer(args: &InferArgs) -> Result<(), CliError> {
    if args.schema.contains('"') {
        return Err(CliError::InvalidArgument(
            "schema name must not contain '\"'".to_string(),
        ));
    }
    let config = args.config()?;

    let mut table = Table::for_source(&args.input, &args.schema, config)?;
    if let Some(name) = &args.table_name {
        table = table.with_name(name.as_str());
    }
    if table.name().contains('"') {
        return Err(CliError::InvalidArgument(format!(
            "table name {} contains a double quote",
            table.name()
        )));
    }

    eprintln!("Inferring schema for {}", table.source().display());
    table.sample()?;
    if let Some(column) = table.columns().iter().find(|c| c.name().contains('"')) {
        return Err(CliError::InvalidArgument(format!(
            "column name {} contains a double quote",
            column.name()
        )));
    }
    table.detect_primary_keys();

    if let Some(format) = &args.report {
        let report = TableReport::new(&table, args.events);
        println!("{}", format_report(&report, format)?);
    }

    let sql = DdlGenerator::new(&table).with_primary_key(args.primary_key);
    if args.dry_run {
        print!("{}", sql.render());
    } else {
        let path = sql.write()?;
        eprintln!("DDL written to: {}", path.display());
    }

    Ok(())
}
