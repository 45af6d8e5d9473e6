//! CLI error types

use std::path::PathBuf;

use thiserror::Error;

use crate::export::ExportError;
use crate::inference::InferenceError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read file {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Inference error: {0}")]
    InferenceError(#[from] InferenceError),

    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),

    #[error("Output error: {0}")]
    OutputError(String),
}
