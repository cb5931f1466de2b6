//! CSV table files

use std::fs::File;
use std::path::{Path, PathBuf};

use super::{ExportError, OutputFormat, TableSink, commit_table_file, prepare_table_path};
use crate::models::Table;
use crate::schema::prettify_column_name;

/// Writes each table to `{directory}/{table}.csv`.
///
/// Missing values are empty cells, floats always carry a fractional part
/// (`1234.0`) and dates are ISO formatted.
#[derive(Debug, Clone)]
pub struct CsvSink {
    directory: PathBuf,
}

impl CsvSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn write_file(&self, table: &Table, path: &Path) -> Result<(), ExportError> {
        let file = File::create(path).map_err(|e| {
            ExportError::IoError(format!("Failed to create {}: {}", path.display(), e))
        })?;
        let mut writer = csv::WriterBuilder::new().from_writer(file);

        writer
            .write_record(table.columns().iter().map(|c| prettify_column_name(c)))
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;

        for record in table.records() {
            writer
                .write_record(record.values().iter().map(ToString::to_string))
                .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        }

        writer
            .flush()
            .map_err(|e| ExportError::IoError(format!("Failed to write {}: {}", path.display(), e)))
    }
}

impl TableSink for CsvSink {
    fn write_table(&mut self, table: &Table) -> Result<(), ExportError> {
        let (path, tmp) = prepare_table_path(&self.directory, table, OutputFormat::Csv)?;
        if let Err(e) = self.write_file(table, &tmp) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        commit_table_file(&tmp, &path)?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}
