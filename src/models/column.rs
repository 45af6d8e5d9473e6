//! Column model

use crate::inference::{ColumnSummary, ColumnValueSet};

/// A source column: its position, name and sampled values
///
/// # Example
///
/// ```rust
/// use csv_schema_sdk::models::Column;
///
/// let mut column = Column::new(0, "id");
/// column.values_mut().add("42");
/// column.values_mut().infer_type().unwrap();
/// assert_eq!(column.definition(), "\"id\" INTEGER NOT NULL");
/// ```
#[derive(Debug, Clone)]
pub struct Column {
    position: usize,
    name: String,
    values: ColumnValueSet,
}

impl Column {
    /// Create an empty column at a zero-based position
    pub fn new(position: usize, name: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
            values: ColumnValueSet::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &ColumnValueSet {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut ColumnValueSet {
        &mut self.values
    }

    /// Column definition for CREATE TABLE: `"name" TYPE NULL|NOT NULL`.
    ///
    /// The name is quoted verbatim; embedded double quotes are not escaped.
    /// A column that was never inferred renders as TEXT.
    pub fn definition(&self) -> String {
        format!(
            "\"{}\" {} {}",
            self.name,
            self.values.sql_type().unwrap_or("TEXT"),
            if self.values.is_nullable() {
                "NULL"
            } else {
                "NOT NULL"
            }
        )
    }

    pub fn summary(&self) -> ColumnSummary {
        self.values.summary()
    }
}
