//! Export functionality
//!
//! Renders an inferred table as PostgreSQL DDL and bulk-load statements.

pub mod sql;

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Export error: {0}")]
    ExportError(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::IoError(err.to_string())
    }
}

// Re-export for convenience
pub use sql::DdlGenerator;
