//! SQL generator for the DROP, CREATE and COPY statements of an inferred table.
//!
//! # Quoting
//!
//! Table and column names are wrapped in double quotes verbatim. Embedded
//! double quotes are not escaped, so names containing `"` must be rejected by
//! the caller. The schema name is emitted unquoted. Single quotes in the source
//! path are doubled inside the COPY string literal.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::export::ExportError;
use crate::inference::NULL_MARKER;
use crate::models::Table;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Generator for PostgreSQL DDL from a fully inferred table.
///
/// # Example
///
/// ```rust
/// use csv_schema_sdk::export::DdlGenerator;
/// use csv_schema_sdk::inference::InferenceConfig;
/// use csv_schema_sdk::models::Table;
///
/// let mut table = Table::new("staging", "users", "/data/users.csv", InferenceConfig::default());
/// table
///     .ingest(vec!["id".to_string()], vec![vec!["1"], vec!["2"]])
///     .unwrap();
/// table.detect_primary_keys();
///
/// let sql = DdlGenerator::new(&table);
/// assert_eq!(sql.drop_statement(), "DROP TABLE IF EXISTS staging.\"users\";");
/// assert_eq!(
///     sql.create_statement(),
///     "CREATE TABLE staging.\"users\" (\"id\" TEXT NOT NULL);"
/// );
/// ```
pub struct DdlGenerator<'a> {
    table: &'a Table,
    primary_key: bool,
}

impl<'a> DdlGenerator<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            primary_key: false,
        }
    }

    /// Append a `PRIMARY KEY (...)` constraint when a key was detected.
    ///
    /// Key detection tolerates a handful of duplicates on large samples. The
    /// constraint is only written when the key prefix has no duplicate in
    /// the sample, since COPY would otherwise fail on load.
    pub fn with_primary_key(mut self, enabled: bool) -> Self {
        self.primary_key = enabled;
        self
    }

    fn qualified_name(&self) -> String {
        format!("{}.\"{}\"", self.table.schema(), self.table.name())
    }

    /// `DROP TABLE IF EXISTS schema."table";`
    pub fn drop_statement(&self) -> String {
        format!("DROP TABLE IF EXISTS {};", self.qualified_name())
    }

    /// `CREATE TABLE schema."table" ("col" TYPE NULL|NOT NULL, ...);`
    pub fn create_statement(&self) -> String {
        let mut definitions: Vec<String> = self
            .table
            .columns()
            .iter()
            .map(|c| c.definition())
            .collect();

        let key_columns = self.table.primary_key_columns();
        if self.primary_key && !key_columns.is_empty() {
            if self.table.primary_key_is_exact() {
                let names: Vec<String> = key_columns
                    .iter()
                    .map(|c| format!("\"{}\"", c.name()))
                    .collect();
                definitions.push(format!("PRIMARY KEY ({})", names.join(", ")));
            } else {
                warn!(
                    table = self.table.name(),
                    "Detected key has duplicates in the sample; omitting PRIMARY KEY"
                );
            }
        }

        format!(
            "CREATE TABLE {} ({});",
            self.qualified_name(),
            definitions.join(", ")
        )
    }

    /// `COPY schema."table" FROM 'path' WITH CSV [HEADER] NULL AS '\N';`
    ///
    /// Non-default delimiter and quote characters are spelled out so the
    /// server parses the file the same way the sampler did.
    pub fn copy_statement(&self) -> String {
        let config = self.table.config();
        let mut options = vec!["CSV".to_string()];
        if config.has_header {
            options.push("HEADER".to_string());
        }
        if config.delimiter != ',' {
            options.push(format!("DELIMITER {}", quote_literal(&config.delimiter.to_string())));
        }
        if config.quote != '"' {
            options.push(format!("QUOTE {}", quote_literal(&config.quote.to_string())));
        }
        options.push(format!("NULL AS {}", quote_literal(NULL_MARKER)));

        format!(
            "COPY {} FROM {} WITH {};",
            self.qualified_name(),
            quote_literal(&self.table.source().to_string_lossy()),
            options.join(" ")
        )
    }

    /// All three statements, each line-terminated
    pub fn render(&self) -> String {
        [
            self.drop_statement(),
            self.create_statement(),
            self.copy_statement(),
        ]
        .iter()
        .map(|statement| format!("{}{}", statement, LINE_ENDING))
        .collect()
    }

    /// `<source file name>.sql` next to the source
    pub fn sidecar_path(&self) -> Result<PathBuf, ExportError> {
        sidecar_path_for(self.table.source())
    }

    /// Write the statements to the sidecar file and return its path
    pub fn write(&self) -> Result<PathBuf, ExportError> {
        let path = self.sidecar_path()?;
        std::fs::write(&path, self.render())?;
        info!(path = %path.display(), table = self.table.name(), "Wrote DDL");
        Ok(path)
    }
}

/// Sidecar path for a source file: same directory, `.sql` appended to the full name
pub fn sidecar_path_for(source: &Path) -> Result<PathBuf, ExportError> {
    let file_name = source.file_name().ok_or_else(|| {
        ExportError::ExportError(format!("source has no file name: {}", source.display()))
    })?;
    let mut sidecar = file_name.to_os_string();
    sidecar.push(".sql");
    Ok(source.with_file_name(sidecar))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
