//! Batches: bounded, in-order slices of the input stream

use super::record::Record;
use super::value::Value;
use std::sync::Arc;

/// An ordered sequence of records sharing one field set.
///
/// Batches are produced by the chunk source in source order and consumed
/// immediately by the router; nothing retains them.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Position of this batch in the stream (0-based)
    index: usize,
    fields: Arc<[String]>,
    records: Vec<Record>,
}

impl Batch {
    pub fn new(index: usize, fields: Arc<[String]>, records: Vec<Record>) -> Self {
        Self {
            index,
            fields,
            records,
        }
    }

    /// Build a batch from rows of values laid out in `fields` order
    pub fn from_rows<F, S>(index: usize, fields: F, rows: Vec<Vec<Value>>) -> Self
    where
        F: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Arc<[String]> = fields.into_iter().map(Into::into).collect();
        let records = rows
            .into_iter()
            .map(|values| Record::new(Arc::clone(&fields), values))
            .collect();
        Self::new(index, fields, records)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn fields(&self) -> &Arc<[String]> {
        &self.fields
    }

    /// Position of a field in this batch's field set
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
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

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// A batch restricted to one target table's fields, in table column order.
///
/// Carries the position of the table's key within its fields so deduplication
/// never has to look the key up by name.
#[derive(Debug, Clone)]
pub struct ProjectedBatch {
    table: String,
    /// Index of the source batch this projection came from
    chunk_index: usize,
    fields: Arc<[String]>,
    key_index: usize,
    records: Vec<Record>,
}

impl ProjectedBatch {
    pub fn new(
        table: impl Into<String>,
        chunk_index: usize,
        fields: Arc<[String]>,
        key_index: usize,
        records: Vec<Record>,
    ) -> Self {
        Self {
            table: table.into(),
            chunk_index,
            fields,
            key_index,
            records,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    pub fn fields(&self) -> &Arc<[String]> {
        &self.fields
    }

    pub fn key_index(&self) -> usize {
        self.key_index
    }

    pub fn key_field(&self) -> &str {
        &self.fields[self.key_index]
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

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
