//! Chunked ingestion of the raw input
//!
//! The raw export is read as a stream of bounded [`Batch`](crate::models::Batch)es
//! so it never has to fit in memory.
//!
//! ## Example
//!
//! ```rust,ignore
//! use star_schema::ingest::{ChunkSource, SourceOptions};
//! use star_schema::schema::StarSchemaSpec;
//!
//! let schema = StarSchemaSpec::default();
//! let source = ChunkSource::open("data/Iowa_Liquor_Sales.csv", &schema, &SourceOptions::default())?;
//! for batch in source {
//!     let batch = batch?;
//!     println!("batch {} has {} records", batch.index(), batch.len());
//! }
//! ```

mod coerce;
mod source;
mod stats;

pub use coerce::{DATE_INPUT_FORMATS, NA_TOKENS, coerce};
pub use source::{ChunkSource, DEFAULT_BATCH_SIZE, SourceOptions};
pub use stats::{IngestStats, MAX_SKIP_SAMPLES};
