//! Newline-delimited JSON table files

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};

use super::{ExportError, OutputFormat, TableSink, commit_table_file, prepare_table_path};
use crate::models::Table;
use crate::schema::prettify_column_name;

/// Writes each table to `{directory}/{table}.ndjson`, one object per record
/// keyed by prettified column name. Missing values are `null`.
#[derive(Debug, Clone)]
pub struct NdjsonSink {
    directory: PathBuf,
}

impl NdjsonSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn write_file(&self, table: &Table, path: &Path) -> Result<(), ExportError> {
        let file = File::create(path).map_err(|e| {
            ExportError::IoError(format!("Failed to create {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        let keys: Vec<String> = table
            .columns()
            .iter()
            .map(|c| prettify_column_name(c))
            .collect();

        for record in table.records() {
            let mut object = Map::with_capacity(keys.len());
            for (key, value) in keys.iter().zip(record.values()) {
                let value = serde_json::to_value(value)
                    .map_err(|e| ExportError::SerializationError(e.to_string()))?;
                object.insert(key.clone(), value);
            }
            serde_json::to_writer(&mut writer, &JsonValue::Object(object))
                .map_err(|e| ExportError::SerializationError(e.to_string()))?;
            writer
                .write_all(b"\n")
                .map_err(|e| ExportError::IoError(e.to_string()))?;
        }

        writer
            .flush()
            .map_err(|e| ExportError::IoError(format!("Failed to write {}: {}", path.display(), e)))
    }
}

impl TableSink for NdjsonSink {
    fn write_table(&mut self, table: &Table) -> Result<(), ExportError> {
        let (path, tmp) = prepare_table_path(&self.directory, table, OutputFormat::Ndjson)?;
        if let Err(e) = self.write_file(table, &tmp) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        commit_table_file(&tmp, &path)?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Record, Value};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_writes_one_object_per_line() {
        let dir = TempDir::new().unwrap();
        let fields: Arc<[String]> =
            vec!["Vendor Number".to_string(), "Vendor Name".to_string()].into();
        let records = vec![
            Record::new(Arc::clone(&fields), vec![Value::Float(260.0), "Diageo".into()]),
            Record::new(Arc::clone(&fields), vec![Value::Float(65.0), Value::Missing]),
        ];
        let table = Table::new("vendor", fields, 0, records);

        NdjsonSink::new(dir.path()).write_table(&table).unwrap();

        let written = std::fs::read_to_string(dir.path().join("vendor.ndjson")).unwrap();
        let lines: Vec<JsonValue> = written
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["vendor_number"], 260.0);
        assert_eq!(lines[0]["vendor_name"], "Diageo");
        assert!(lines[1]["vendor_name"].is_null());
    }
}
