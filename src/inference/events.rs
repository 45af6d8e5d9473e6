//! Structured diagnostics produced while inferring a table

use serde::{Deserialize, Serialize};

use super::types::{ColumnType, RuleHit};

/// Something the engine decided, recorded in the order it happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum InferenceEvent {
    /// Sampling finished
    #[serde(rename_all = "camelCase")]
    Sampled { columns: usize, rows: usize },
    /// An elimination rule fired for a column
    #[serde(rename_all = "camelCase")]
    RuleApplied { column: String, hit: RuleHit },
    /// Final type chosen for a column
    #[serde(rename_all = "camelCase")]
    TypeInferred {
        column: String,
        column_type: ColumnType,
        nullable: bool,
    },
    /// Key search found a unique prefix
    #[serde(rename_all = "camelCase")]
    KeyDetected { length: usize, columns: Vec<String> },
    /// No prefix is unique over the sample
    #[serde(rename_all = "camelCase")]
    KeyNotFound { rows: usize },
    /// A key column was widened to text
    #[serde(rename_all = "camelCase")]
    KeyColumnCastToText { column: String, from: ColumnType },
    /// Non-key columns lost their NOT NULL constraint
    #[serde(rename_all = "camelCase")]
    ColumnsForcedNullable { columns: Vec<String> },
}
