//! Output formatting for CLI

use serde::Serialize;

use crate::cli::error::CliError;
use crate::inference::{ColumnSummary, InferenceEvent};
use crate::models::{Column, Table};

/// One column of the inference report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnReport {
    pub position: usize,
    pub name: String,
    pub sql_type: String,
    #[serde(flatten)]
    pub summary: ColumnSummary,
}

impl From<&Column> for ColumnReport {
    fn from(column: &Column) -> Self {
        Self {
            position: column.position(),
            name: column.name().to_string(),
            sql_type: column.values().sql_type().unwrap_or("TEXT").to_string(),
            summary: column.summary(),
        }
    }
}

/// Everything the engine decided about one table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReport {
    pub schema: String,
    pub table: String,
    pub source: String,
    pub rows_sampled: usize,
    pub primary_key_length: Option<usize>,
    pub primary_key_columns: Vec<String>,
    pub possible_key_columns: Vec<String>,
    pub columns: Vec<ColumnReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<InferenceEvent>,
}

impl TableReport {
    pub fn new(table: &Table, include_events: bool) -> Self {
        Self {
            schema: table.schema().to_string(),
            table: table.name().to_string(),
            source: table.source().display().to_string(),
            rows_sampled: table.rows().len(),
            primary_key_length: table.primary_key_length(),
            primary_key_columns: names(table.primary_key_columns()),
            possible_key_columns: table.possible_key_names().to_vec(),
            columns: table.columns().iter().map(ColumnReport::from).collect(),
            events: if include_events {
                table.events().to_vec()
            } else {
                Vec::new()
            },
        }
    }
}

fn names(columns: Vec<&Column>) -> Vec<String> {
    columns.iter().map(|c| c.name().to_string()).collect()
}

/// Human-readable per-column summary
pub fn format_text_report(report: &TableReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Table {}.\"{}\" ({} rows sampled from {})\n",
        report.schema, report.table, report.rows_sampled, report.source
    ));

    for column in &report.columns {
        let summary = &column.summary;
        output.push_str(&format!("\nColumn #{} - {}\n", column.position, column.name));
        output.push_str(&format!(
            "\t\tType: {} ({})\n",
            summary
                .column_type
                .map(|t| t.type_name())
                .unwrap_or("unknown"),
            column.sql_type
        ));
        output.push_str(&format!("\t\tNullable: {}\n", summary.nullable));
        output.push_str(&format!(
            "\t\tnum_values: {} total ({} unique)\n",
            summary.total, summary.distinct
        ));
        output.push_str(&format!(
            "\t\tentropy: {:.6} (expected if uniform: {:.6})\n",
            summary.entropy, summary.entropy_if_uniform
        ));
    }

    output.push('\n');
    if report.possible_key_columns.is_empty() {
        output.push_str("No columns qualify as potential key columns.\n");
    } else {
        output.push_str(&format!(
            "Potential key columns: {}\n",
            report.possible_key_columns.join(", ")
        ));
    }
    match report.primary_key_length {
        Some(length) => output.push_str(&format!(
            "Primary key ({} column(s)): {}\n",
            length,
            report.primary_key_columns.join(", ")
        )),
        None => output.push_str("No primary key found; all columns are nullable.\n"),
    }

    output
}

/// Render a report in the requested format (text, json, yaml)
pub fn format_report(report: &TableReport, format: &str) -> Result<String, CliError> {
    match format {
        "text" => Ok(format_text_report(report)),
        "json" => serde_json::to_string_pretty(report)
            .map_err(|e| CliError::OutputError(e.to_string())),
        "yaml" => serde_yaml::to_string(report).map_err(|e| CliError::OutputError(e.to_string())),
        other => Err(CliError::InvalidArgument(format!(
            "Unknown output format: {}",
            other
        ))),
    }
}
