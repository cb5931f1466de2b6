//! Star Schema SDK - streaming decomposition of flat exports
//!
//! Provides:
//! - Chunked, typed ingestion of large delimited exports
//! - Projection of every chunk onto fact and dimension tables
//! - Two-stage first-seen-wins deduplication on each table's key
//! - CSV, NDJSON and in-memory sinks for the finalized tables
//! - Configuration files with environment overrides

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod validation;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{Result, StarError};
pub use export::{CsvSink, ExportError, MemorySink, NdjsonSink, OutputFormat, TableSink};
pub use ingest::{ChunkSource, IngestStats, SourceOptions};
pub use models::{Batch, ColumnType, ProjectedBatch, Record, Table, Value};
pub use pipeline::{StarPipeline, StarSchema, decompose, decompose_file};
pub use schema::{StarSchemaSpec, TableRole, TargetTableSpec};
pub use validation::{SpecValidationError, SpecValidator};
