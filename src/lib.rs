//! CSV Schema SDK - infer PostgreSQL tables from delimited text files
//!
//! Provides:
//! - Type, nullability and entropy inference over sampled column values
//! - Primary key discovery from the shortest unique prefix of columns
//! - DROP / CREATE / COPY statement generation and sidecar `.sql` files

pub mod cli;
pub mod export;
pub mod inference;
pub mod models;

// Re-export commonly used types
pub use export::{DdlGenerator, ExportError};
pub use inference::{
    ColumnSummary, ColumnType, ColumnValueSet, InferenceConfig, InferenceError, InferenceEvent,
};
pub use models::{Column, ColumnCollection, Table};
