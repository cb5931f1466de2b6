//! Chunk source: bounded batches of typed records from a delimited file

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};

use super::coerce::coerce;
use super::stats::IngestStats;
use crate::error::{Result, StarError};
use crate::models::{Batch, ColumnType, Record};
use crate::schema::StarSchemaSpec;

/// Default maximum number of records per batch
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Upper bound on the per-batch buffer allocated up front
const MAX_PREALLOCATED_RECORDS: usize = 65_536;

/// Options for reading the raw input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOptions {
    /// Maximum number of records per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Field delimiter (single ASCII character)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Whether the first row is a header. Without a header, the input columns
    /// are taken to be the schema's source fields in first-use order.
    #[serde(default = "default_has_headers")]
    pub has_headers: bool,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_delimiter() -> char {
    ','
}

fn default_has_headers() -> bool {
    true
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            delimiter: default_delimiter(),
            has_headers: default_has_headers(),
        }
    }
}

impl SourceOptions {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Where a used source field sits in the input rows, and its declared type
#[derive(Debug, Clone)]
struct SourceColumn {
    header_index: usize,
    ty: ColumnType,
}

/// A lazy, finite, non-restartable sequence of [`Batch`]es.
///
/// Only the fields used by some target table are materialized. Rows whose
/// field count differs from the header, that cannot be decoded, or whose used
/// cells cannot be coerced to their declared type are skipped and counted in
/// [`IngestStats`]; they never end the sequence. An I/O failure while reading
/// ends it with [`StarError::SourceUnavailable`].
pub struct ChunkSource<R: Read> {
    reader: csv::Reader<R>,
    path: PathBuf,
    fields: Arc<[String]>,
    columns: Vec<SourceColumn>,
    header_len: usize,
    batch_size: usize,
    next_index: usize,
    row: StringRecord,
    stats: IngestStats,
    done: bool,
}

impl ChunkSource<File> {
    /// Open a delimited file
    pub fn open(
        path: impl AsRef<Path>,
        schema: &StarSchemaSpec,
        options: &SourceOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| StarError::source_unavailable(path, e))?;
        Self::build(file, path.to_path_buf(), schema, options)
    }
}

impl<R: Read> ChunkSource<R> {
    /// Read from any `Read`, e.g. an in-memory buffer
    pub fn from_reader(
        reader: R,
        schema: &StarSchemaSpec,
        options: &SourceOptions,
    ) -> Result<Self> {
        Self::build(reader, PathBuf::from("<reader>"), schema, options)
    }

    fn build(
        reader: R,
        path: PathBuf,
        schema: &StarSchemaSpec,
        options: &SourceOptions,
    ) -> Result<Self> {
        if options.batch_size == 0 {
            return Err(StarError::Config(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        let delimiter = u8::try_from(options.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                StarError::Config(format!(
                    "delimiter must be a single ASCII character, got '{}'",
                    options.delimiter
                ))
            })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(options.has_headers)
            .flexible(true)
            .from_reader(reader);

        let source_fields = schema.source_fields();
        let header: Vec<String> = if options.has_headers {
            reader
                .headers()
                .map_err(|e| StarError::source_unavailable(&path, e))?
                .iter()
                .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
                .collect()
        } else {
            source_fields.clone()
        };

        let columns = source_fields
            .iter()
            .map(|field| {
                header
                    .iter()
                    .position(|h| h == field)
                    .map(|header_index| SourceColumn {
                        header_index,
                        ty: schema.column_type(field),
                    })
                    .ok_or_else(|| StarError::MissingColumn {
                        column: field.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Opened source {} ({} header columns, {} used)",
            path.display(),
            header.len(),
            columns.len()
        );

        Ok(Self {
            reader,
            path,
            fields: source_fields.into(),
            columns,
            header_len: header.len(),
            batch_size: options.batch_size,
            next_index: 0,
            row: StringRecord::new(),
            stats: IngestStats::new(),
            done: false,
        })
    }

    /// Field names carried by every batch
    pub fn fields(&self) -> &Arc<[String]> {
        &self.fields
    }

    /// Counters for rows read and skipped so far
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Bytes consumed from the input so far
    pub fn bytes_read(&self) -> u64 {
        self.reader.position().byte()
    }

    pub fn into_stats(self) -> IngestStats {
        self.stats
    }

    fn parse_row(&self) -> std::result::Result<Record, StarError> {
        let line = self.row.position().map(|p| p.line()).unwrap_or(0);

        if self.row.len() != self.header_len {
            return Err(StarError::MalformedRecord {
                line,
                reason: format!(
                    "expected {} fields, found {}",
                    self.header_len,
                    self.row.len()
                ),
            });
        }

        let values = self
            .columns
            .iter()
            .zip(self.fields.iter())
            .map(|(column, field)| {
                coerce(&self.row[column.header_index], column.ty).map_err(|reason| {
                    StarError::MalformedRecord {
                        line,
                        reason: format!("{}: {}", field, reason),
                    }
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Record::new(Arc::clone(&self.fields), values))
    }

    fn next_batch(&mut self) -> Option<Result<Batch>> {
        if self.done {
            return None;
        }

        let mut records = Vec::with_capacity(self.batch_size.min(MAX_PREALLOCATED_RECORDS));
        while records.len() < self.batch_size {
            match self.reader.read_record(&mut self.row) {
                Ok(true) => match self.parse_row() {
                    Ok(record) => {
                        self.stats.records_read += 1;
                        records.push(record);
                    }
                    Err(err) => {
                        tracing::trace!("Skipping row: {}", err);
                        self.stats.record_skip(err.to_string());
                    }
                },
                Ok(false) => {
                    self.done = true;
                    break;
                }
                Err(err) => {
                    if let csv::ErrorKind::Io(_) = err.kind() {
                        self.done = true;
                        return Some(Err(StarError::source_unavailable(&self.path, err)));
                    }
                    let skipped = StarError::MalformedRecord {
                        line: err.position().map(|p| p.line()).unwrap_or(0),
                        reason: err.to_string(),
                    };
                    tracing::trace!("Skipping row: {}", skipped);
                    self.stats.record_skip(skipped.to_string());
                }
            }
        }

        self.stats.bytes_processed = self.reader.position().byte();

        if records.is_empty() {
            return None;
        }

        let batch = Batch::new(self.next_index, Arc::clone(&self.fields), records);
        self.next_index += 1;
        Some(Ok(batch))
    }
}

impl<R: Read> Iterator for ChunkSource<R> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch()
    }
}
