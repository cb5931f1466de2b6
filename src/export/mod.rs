//! Export functionality
//!
//! Persists finalized tables through a [`TableSink`]:
//! - CSV, one file per table
//! - NDJSON, one file per table
//! - in memory
//!
//! Column headers are prettified with
//! [`prettify_column_name`](crate::schema::prettify_column_name), so
//! `Bottle Volume (ml)` is written as `bottle_volume_ml`.

pub mod csv_sink;
pub mod memory;
pub mod ndjson;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Table;
use crate::pipeline::StarSchema;

pub use csv_sink::CsvSink;
pub use memory::MemorySink;
pub use ndjson::NdjsonSink;

/// Error during export
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Export error: {0}")]
    ExportError(String),
}

/// Destination for finalized tables
pub trait TableSink {
    /// Persist one finalized table
    fn write_table(&mut self, table: &Table) -> Result<(), ExportError>;
}

/// Hand every table of a run to `sink`, in declaration order
pub fn write_schema<S: TableSink + ?Sized>(
    sink: &mut S,
    schema: &StarSchema,
) -> Result<(), ExportError> {
    for table in schema.iter() {
        sink.write_table(table)?;
        tracing::info!("Wrote table '{}' ({} records)", table.name(), table.len());
    }
    Ok(())
}

/// File format for persisted tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Ndjson,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Ndjson => "ndjson",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "ndjson" | "jsonl" | "json-lines" => Ok(OutputFormat::Ndjson),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// File sink for `format` writing into `directory`
pub fn sink_for(format: OutputFormat, directory: impl Into<PathBuf>) -> Box<dyn TableSink> {
    match format {
        OutputFormat::Csv => Box::new(CsvSink::new(directory)),
        OutputFormat::Ndjson => Box::new(NdjsonSink::new(directory)),
    }
}

/// Final and temporary paths of a table file, creating the directory if needed
pub(crate) fn prepare_table_path(
    directory: &Path,
    table: &Table,
    format: OutputFormat,
) -> Result<(PathBuf, PathBuf), ExportError> {
    fs::create_dir_all(directory).map_err(|e| {
        ExportError::IoError(format!(
            "Failed to create directory {}: {}",
            directory.display(),
            e
        ))
    })?;
    let path = directory.join(format!("{}.{}", table.name(), format.extension()));
    let tmp = directory.join(format!("{}.{}.tmp", table.name(), format.extension()));
    Ok((path, tmp))
}

/// Move a fully written temporary file into place
pub(crate) fn commit_table_file(tmp: &Path, path: &Path) -> Result<(), ExportError> {
    fs::rename(tmp, path).map_err(|e| {
        let _ = fs::remove_file(tmp);
        ExportError::IoError(format!("Failed to write {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("NDJSON".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert!("parquet".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Ndjson.to_string(), "ndjson");
    }
}
