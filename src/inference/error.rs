//! Error types for schema inference

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during schema inference
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// Source path is not an existing regular file
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Source file contains no records at all
    #[error("Input file is empty: {}", .0.display())]
    EmptyInput(PathBuf),

    /// Values the bulk loader cannot represent were sampled
    #[error("Invalid values found in file '{}': {}", path.display(), values.join(", "))]
    DataQuality { path: PathBuf, values: Vec<String> },

    /// Type elimination left no viable candidate
    #[error("Invalid inference state: {0}")]
    InvalidState(String),

    /// No prefix of columns identifies every sampled row
    #[error("No primary key found: no column prefix is unique across {rows} rows and {columns} columns")]
    AmbiguousKey { rows: usize, columns: usize },

    /// Invalid parsing configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Delimited reader error
    #[error("CSV error in {} at record {position}: {message}", path.display())]
    Csv {
        path: PathBuf,
        position: u64,
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for InferenceError {
    fn from(e: std::io::Error) -> Self {
        InferenceError::Io(e.to_string())
    }
}

impl InferenceError {
    /// Wrap a reader error with the file it came from
    pub(crate) fn csv(path: &std::path::Path, err: csv::Error) -> Self {
        let position = err.position().map(|p| p.record()).unwrap_or(0);
        if let csv::ErrorKind::Io(io) = err.kind() {
            return InferenceError::Io(io.to_string());
        }
        InferenceError::Csv {
            path: path.to_path_buf(),
            position,
            message: err.to_string(),
        }
    }
}
