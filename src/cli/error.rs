//! CLI-specific error types

use crate::error::StarError;
use crate::export::ExportError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to write file {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("Pipeline error: {0}")]
    PipelineError(#[from] StarError),

    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),

    #[error("Logging error: {0}")]
    LoggingError(String),
}
