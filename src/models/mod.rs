//! Data models for the decomposition pipeline
//!
//! - [`Value`] / [`ColumnType`]: typed scalar cells
//! - [`Record`]: ordered field → value mapping
//! - [`Batch`] / [`ProjectedBatch`]: in-flight slices of the stream
//! - [`Table`]: a finalized, deduplicated target table

pub mod batch;
pub mod record;
pub mod table;
pub mod value;

pub use batch::{Batch, ProjectedBatch};
pub use record::Record;
pub use table::Table;
pub use value::{ColumnType, DATE_FORMAT, Value};
