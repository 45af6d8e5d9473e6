//! CLI command implementations

pub mod infer;
