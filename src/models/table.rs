//! Finalized table model

use super::record::Record;
use super::value::Value;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// A finalized, globally deduplicated table for one target spec.
///
/// No two records share a key value, and for every key the retained record is
/// the first one seen in source order. Tables are produced once by the merger
/// and are not mutated afterwards.
///
/// # Example
///
/// ```rust
/// use star_schema::models::{Record, Table, Value};
///
/// let fields: std::sync::Arc<[String]> = vec!["County Number".to_string(), "County".to_string()].into();
/// let table = Table::new(
///     "county",
///     fields.clone(),
///     0,
///     vec![Record::new(fields, vec![Value::Float(85.0), "Story".into()])],
/// );
/// assert_eq!(table.len(), 1);
/// assert!(table.get(&Value::Float(85.0)).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Arc<[String]>,
    key_index: usize,
    records: Vec<Record>,
}

impl Table {
    pub fn new(
        name: impl Into<String>,
        columns: Arc<[String]>,
        key_index: usize,
        records: Vec<Record>,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            key_index,
            records,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in projection order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn key(&self) -> &str {
        &self.columns[self.key_index]
    }

    pub fn key_index(&self) -> usize {
        self.key_index
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Key values in table order
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.records.iter().map(|r| r.value_at(self.key_index))
    }

    /// Record holding the given key, if any
    pub fn get(&self, key: &Value) -> Option<&Record> {
        self.records.iter().find(|r| r.value_at(self.key_index) == key)
    }

    /// SHA-256 over the table name, columns and rendered rows
    ///
    /// Two runs over the same input produce the same fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        for column in self.columns.iter() {
            hasher.update([0x1f]);
            hasher.update(column.as_bytes());
        }
        for record in &self.records {
            hasher.update([0x1e]);
            for value in record.values() {
                // Tag each cell so Missing and an empty string never collide
                let tag = match value.column_type() {
                    None => b'm',
                    Some(_) => b'v',
                };
                hasher.update([0x1f, tag]);
                hasher.update(value.to_string().as_bytes());
            }
        }
        format!("{:x}", hasher.finalize())
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
