//! Error types for the decomposition pipeline

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::SpecValidationError;

/// Errors raised while decomposing a source into a star schema.
///
/// `MalformedRecord` never escapes the chunk source: rows that fail to parse are
/// counted and skipped. Every other variant aborts the run, and no table from an
/// aborted run should be persisted.
#[derive(Debug, Error)]
pub enum StarError {
    /// The input could not be opened or read
    #[error("Source unavailable: {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// A single row failed structural parsing or type coercion
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// A configured source field is not present in the input header
    #[error("Column '{column}' not found in input header")]
    MissingColumn { column: String },

    /// Append attempted on a table that has already been finalized
    #[error("Cannot append to finalized table '{table}'")]
    LateAppend { table: String },

    /// Finalization attempted twice on the same table
    #[error("Table '{table}' has already been finalized")]
    AlreadyFinalized { table: String },

    /// A sub-batch does not carry the columns its target table expects
    #[error("Sub-batch columns do not match table '{table}'")]
    SchemaMismatch { table: String },

    /// Target table specs failed validation
    #[error("Invalid table spec: {0}")]
    InvalidSpec(#[from] SpecValidationError),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, StarError>;

impl StarError {
    /// Build a `SourceUnavailable` error from any displayable cause
    pub fn source_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StarError::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error aborts the run (everything except a skipped row)
    pub fn is_fatal(&self) -> bool {
        !matches!(self, StarError::MalformedRecord { .. })
    }
}
