//! Schema inference engine for delimited files
//!
//! This module infers SQL column types, nullability and a primary key from a
//! sample of raw string values.
//!
//! ## Features
//!
//! - **Type elimination** - Narrow each column to INTEGER, NUMERIC or TEXT
//! - **Nullability tracking** - Columns containing the `\N` marker are nullable
//! - **Entropy statistics** - Shannon entropy per column, in nats
//! - **Key discovery** - Smallest unique prefix of columns over the sample
//!
//! ## Example
//!
//! ```rust
//! use csv_schema_sdk::inference::{ColumnType, ColumnValueSet};
//!
//! let mut values: ColumnValueSet = ["1", "2", "\\N"].into_iter().collect();
//! assert_eq!(values.infer_type().unwrap(), ColumnType::Integer);
//! assert!(values.is_nullable());
//! ```

mod config;
mod error;
mod events;
mod types;
mod values;

pub use config::{DEFAULT_SAMPLE_SIZE, InferenceConfig, InferenceConfigBuilder, NULL_MARKER};
pub use error::InferenceError;
pub use events::InferenceEvent;
pub use types::{
    CandidateSet, ColumnType, Elimination, Rule, RuleHit, Verdict, classify, eliminate,
};
pub use values::{ColumnSummary, ColumnValueSet, KEY_TOLERANCE, UNIFORM_TOLERANCE};
