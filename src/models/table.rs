//! Table model: sampling a delimited file and discovering its primary key

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::collection::ColumnCollection;
use super::column::Column;
use crate::inference::{
    ColumnType, ColumnValueSet, InferenceConfig, InferenceError, InferenceEvent, KEY_TOLERANCE,
};

/// A table inferred from one source file
///
/// Created per run, populated once by [`Table::sample`], refined once by
/// [`Table::detect_primary_keys`], then handed to the DDL generator.
#[derive(Debug, Clone)]
pub struct Table {
    schema: String,
    name: String,
    source: PathBuf,
    config: InferenceConfig,
    columns: ColumnCollection,
    /// Sampled rows, kept for the repeated passes of the key search
    rows: Vec<Vec<String>>,
    primary_key_length: Option<usize>,
    /// Possible key columns as judged on the inferred types
    possible_keys: Vec<String>,
    events: Vec<InferenceEvent>,
}

impl Table {
    /// Create an empty table without touching the filesystem
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        config: InferenceConfig,
    ) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            source: source.into(),
            config,
            columns: ColumnCollection::new(),
            rows: Vec::new(),
            primary_key_length: None,
            possible_keys: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Create a table for a source file.
    ///
    /// The path is made absolute and must name an existing regular file. The
    /// table is named after the file name up to its first `.`.
    pub fn for_source(
        path: impl AsRef<Path>,
        schema: impl Into<String>,
        config: InferenceConfig,
    ) -> Result<Self, InferenceError> {
        config.validate()?;
        let source = std::path::absolute(path.as_ref())?;
        if !source.is_file() {
            return Err(InferenceError::InputNotFound(source));
        }
        let name = table_name_for(&source);
        Ok(Self::new(schema, name, source, config))
    }

    /// Replace the name derived from the file name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sample, infer types and detect the primary key in one go
    pub fn infer(
        path: impl AsRef<Path>,
        schema: impl Into<String>,
        config: InferenceConfig,
    ) -> Result<Self, InferenceError> {
        let mut table = Self::for_source(path, schema, config)?;
        table.sample()?;
        table.detect_primary_keys();
        Ok(table)
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the source file
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn has_header(&self) -> bool {
        self.config.has_header
    }

    pub fn columns(&self) -> &ColumnCollection {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn events(&self) -> &[InferenceEvent] {
        &self.events
    }

    /// Read the header and up to `sample_size` data rows, then infer column types
    pub fn sample(&mut self) -> Result<(), InferenceError> {
        let source = self.source.clone();
        let file = File::open(&source).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => InferenceError::InputNotFound(source.clone()),
            _ => InferenceError::from(e),
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.config.delimiter_byte()?)
            .quote(self.config.quote_byte()?)
            .from_reader(BufReader::new(file));
        let mut records = reader.records();

        let first = match records.next() {
            Some(record) => record.map_err(|e| InferenceError::csv(&source, e))?,
            None => return Err(InferenceError::EmptyInput(source)),
        };
        let (names, first_data): (Vec<String>, Option<csv::StringRecord>) =
            if self.config.has_header {
                (first.iter().map(str::to_string).collect(), None)
            } else {
                ((0..first.len()).map(|i| format!("c_{}", i)).collect(), Some(first))
            };
        self.define_columns(names)?;

        let limit = match self.config.sample_size {
            0 => usize::MAX,
            n => n,
        };
        debug!(source = %source.display(), limit, "Sampling rows");
        for record in first_data
            .into_iter()
            .map(Ok::<_, csv::Error>)
            .chain(records)
            .take(limit)
        {
            let record = record.map_err(|e| InferenceError::csv(&source, e))?;
            self.push_row(record.iter().map(str::to_string).collect())?;
        }

        self.finish_sampling()
    }

    /// Populate the table from in-memory records instead of a file
    pub fn ingest<R, S>(
        &mut self,
        column_names: Vec<String>,
        rows: impl IntoIterator<Item = R>,
    ) -> Result<(), InferenceError>
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.define_columns(column_names)?;
        for row in rows {
            self.push_row(row.into_iter().map(Into::into).collect())?;
        }
        self.finish_sampling()
    }

    fn define_columns(&mut self, names: Vec<String>) -> Result<(), InferenceError> {
        self.columns = ColumnCollection::new();
        self.rows.clear();
        self.primary_key_length = None;
        self.possible_keys.clear();
        self.events.clear();
        for (position, name) in names.into_iter().enumerate() {
            self.columns.add(Column::new(position, name))?;
        }
        Ok(())
    }

    fn push_row(&mut self, row: Vec<String>) -> Result<(), InferenceError> {
        if row.len() != self.columns.len() {
            return Err(InferenceError::InvalidState(format!(
                "row {} has {} fields, expected {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        for (column, value) in self.columns.iter_mut().zip(&row) {
            column.values_mut().add(value.as_str());
        }
        self.rows.push(row);
        Ok(())
    }

    fn finish_sampling(&mut self) -> Result<(), InferenceError> {
        self.events.push(InferenceEvent::Sampled {
            columns: self.columns.len(),
            rows: self.rows.len(),
        });

        for column in self.columns.iter_mut() {
            let column_type = column.values_mut().infer_type()?;
            for hit in column.values().rule_hits() {
                debug!(
                    column = column.name(),
                    rule = %hit.rule,
                    column_type = %hit.column_type,
                    value = %hit.value,
                    forced = hit.forced,
                    "Elimination rule applied"
                );
                self.events.push(InferenceEvent::RuleApplied {
                    column: column.name().to_string(),
                    hit: hit.clone(),
                });
            }
            self.events.push(InferenceEvent::TypeInferred {
                column: column.name().to_string(),
                column_type,
                nullable: column.values().is_nullable(),
            });
        }

        if self.config.validate_values {
            let empty_quoted = self.config.empty_quoted();
            for column in &self.columns {
                column
                    .values()
                    .validate_for_bulk_load(&self.source, &empty_quoted)?;
            }
        }

        for column in &self.columns {
            let summary = column.summary();
            debug!(
                position = column.position(),
                column = column.name(),
                column_type = ?summary.column_type,
                nullable = summary.nullable,
                total = summary.total,
                distinct = summary.distinct,
                entropy = summary.entropy,
                entropy_if_uniform = summary.entropy_if_uniform,
                "Column summary"
            );
        }
        Ok(())
    }

    /// Columns whose distinct values occur with equal frequency.
    ///
    /// A loose filter only; uniqueness is decided by the prefix search. This
    /// looks at the current types, so after [`Table::detect_primary_keys`]
    /// has cast the key to text, use [`Table::possible_key_names`] instead.
    pub fn possible_key_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.values().is_possible_key_column())
            .collect()
    }

    /// Find the shortest unique column prefix and adjust types and nullability.
    ///
    /// Key columns become NOT NULL TEXT. Every other column becomes nullable,
    /// whatever was inferred for it; with no key that is every column.
    pub fn detect_primary_keys(&mut self) -> Option<usize> {
        self.possible_keys = self
            .possible_key_columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        debug!(columns = ?self.possible_keys, "Possible key columns");

        let key_length = self.primary_key_search();
        let key_length_or_zero = key_length.unwrap_or(0);

        match key_length {
            Some(length) => {
                let names: Vec<String> = self.columns.names().into_iter().take(length).collect();
                info!(length, columns = ?names, "Entropy analysis suggested a primary key");
                self.events.push(InferenceEvent::KeyDetected {
                    length,
                    columns: names,
                });
            }
            None => {
                warn!(
                    rows = self.rows.len(),
                    "No unique column prefix; table has no primary key"
                );
                self.events.push(InferenceEvent::KeyNotFound {
                    rows: self.rows.len(),
                });
            }
        }

        for column in self.columns.iter_mut().take(key_length_or_zero) {
            if let Some(from) = column.values().inferred_type()
                && from != ColumnType::Text
            {
                info!(column = column.name(), from = %from, "Primary key column cast to text");
                self.events.push(InferenceEvent::KeyColumnCastToText {
                    column: column.name().to_string(),
                    from,
                });
            }
            let values = column.values_mut();
            values.force_type(ColumnType::Text);
            values.set_nullable(false);
        }

        let mut forced = Vec::new();
        for column in self.columns.iter_mut().skip(key_length_or_zero) {
            column.values_mut().set_nullable(true);
            forced.push(column.name().to_string());
        }
        if !forced.is_empty() {
            debug!(columns = ?forced, "Non-key columns forced nullable");
            self.events
                .push(InferenceEvent::ColumnsForcedNullable { columns: forced });
        }

        self.primary_key_length = key_length;
        key_length
    }

    /// Shortest `k` such that the first `k` fields identify every sampled row
    fn primary_key_search(&self) -> Option<usize> {
        if self.rows.is_empty() {
            return None;
        }
        (1..=self.columns.len()).find(|&k| self.is_key_prefix(k))
    }

    fn is_key_prefix(&self, k: usize) -> bool {
        // A unique column inside the shorter prefix means a shorter key was missed
        if let Some(column) = self
            .columns
            .iter()
            .take(k - 1)
            .find(|c| c.values().is_unique())
        {
            debug!(k, column = column.name(), "Skipping prefix containing a unique column");
            return false;
        }

        let candidate: ColumnValueSet = self
            .rows
            .iter()
            .map(|row| candidate_key(&row[..k]))
            .collect();
        (candidate.max_entropy() - candidate.entropy()).abs() < KEY_TOLERANCE
    }

    /// Possible key columns captured before key detection changed any type
    pub fn possible_key_names(&self) -> &[String] {
        &self.possible_keys
    }

    /// Detected key length, if any
    pub fn primary_key_length(&self) -> Option<usize> {
        self.primary_key_length
    }

    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .take(self.primary_key_length.unwrap_or(0))
            .collect()
    }

    /// Whether the detected key has no duplicate at all in the sample.
    ///
    /// The entropy test tolerates a few duplicates on large samples; a
    /// database constraint does not.
    pub fn primary_key_is_exact(&self) -> bool {
        let Some(length) = self.primary_key_length else {
            return false;
        };
        let mut seen = HashSet::with_capacity(self.rows.len());
        self.rows
            .iter()
            .all(|row| seen.insert(candidate_key(&row[..length])))
    }

    /// Key length, or an error for callers that cannot proceed without one
    pub fn require_primary_key(&self) -> Result<usize, InferenceError> {
        self.primary_key_length
            .ok_or(InferenceError::AmbiguousKey {
                rows: self.rows.len(),
                columns: self.columns.len(),
            })
    }
}

/// `"v0","v1",...` for one row prefix
fn candidate_key(fields: &[String]) -> String {
    fields
        .iter()
        .map(|v| format!("\"{}\"", v))
        .collect::<Vec<_>>()
        .join(",")
}

/// File name up to its first `.`
fn table_name_for(source: &Path) -> String {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name,
    }
}
