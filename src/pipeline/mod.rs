//! Star-schema decomposition pipeline
//!
//! Streams batches from a source, projects each onto every target table,
//! deduplicates within the chunk, accumulates, and runs one global
//! first-seen-wins merge per table at the end.
//!
//! ## Example
//!
//! ```rust
//! use star_schema::models::{Batch, Value};
//! use star_schema::pipeline::StarPipeline;
//! use star_schema::schema::{StarSchemaSpec, TargetTableSpec};
//!
//! let schema = StarSchemaSpec::new(
//!     vec![TargetTableSpec::dimension("store", ["Store Number", "City"], "Store Number")],
//!     Default::default(),
//! );
//! let mut pipeline = StarPipeline::new(&schema).unwrap();
//! pipeline
//!     .process_batch(Batch::from_rows(
//!         0,
//!         ["Store Number", "City"],
//!         vec![
//!             vec![Value::from("1"), Value::from("Ames")],
//!             vec![Value::from("1"), Value::from("Amess")],
//!         ],
//!     ))
//!     .unwrap();
//! let result = pipeline.finish().unwrap();
//! assert_eq!(result.table("store").unwrap().len(), 1);
//! ```

pub mod accumulator;
pub mod dedup;
pub mod merger;
pub mod router;

pub use accumulator::{Accumulator, AccumulatorState};
pub use dedup::{dedup_batch, dedup_first_seen};
pub use merger::merge;
pub use router::SchemaRouter;

use std::io::Read;
use std::path::Path;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::ingest::{ChunkSource, IngestStats};
use crate::models::{Batch, Table};
use crate::schema::StarSchemaSpec;
use crate::validation::SpecValidator;

/// The finalized tables of a run, in declaration order, with run statistics
#[derive(Debug, Clone)]
pub struct StarSchema {
    pub tables: Vec<Table>,
    pub stats: IngestStats,
}

impl StarSchema {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// The table declared with the fact role, if any
    pub fn fact_table(&self, schema: &StarSchemaSpec) -> Option<&Table> {
        schema
            .tables
            .iter()
            .find(|spec| spec.is_fact())
            .and_then(|spec| self.table(&spec.name))
    }
}

/// Drives batches through router, per-chunk dedup and accumulators
#[derive(Debug)]
pub struct StarPipeline {
    router: SchemaRouter,
    accumulators: Vec<Accumulator>,
    stats: IngestStats,
    started: Instant,
}

impl StarPipeline {
    /// Validate the schema and set up one accumulator per target table
    pub fn new(schema: &StarSchemaSpec) -> Result<Self> {
        SpecValidator::new().validate(&schema.tables)?;

        let accumulators = schema
            .tables
            .iter()
            .map(Accumulator::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            router: SchemaRouter::new(&schema.tables),
            accumulators,
            stats: IngestStats::new(),
            started: Instant::now(),
        })
    }

    /// Accumulator of a target table, by name
    pub fn accumulator(&self, table: &str) -> Option<&Accumulator> {
        self.accumulators.iter().find(|a| a.table() == table)
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Route one batch, dedup each projection and append it to its table.
    ///
    /// Counts the batch's rows as read; a driving [`ChunkSource`] overwrites
    /// that count with its own after each batch.
    pub fn process_batch(&mut self, batch: Batch) -> Result<()> {
        let index = batch.index();
        let rows = batch.len();

        for (accumulator, projected) in self
            .accumulators
            .iter_mut()
            .zip(self.router.route(&batch))
        {
            accumulator.append(dedup_batch(projected))?;
        }

        self.stats.batches_processed += 1;
        self.stats.records_read += rows;
        tracing::debug!("Processed batch {} ({} records)", index, rows);
        Ok(())
    }

    /// Consume batches until the sequence ends or yields an error
    pub fn run<I>(&mut self, batches: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<Batch>>,
    {
        for batch in batches {
            self.process_batch(batch?)?;
        }
        Ok(())
    }

    /// Drain a chunk source, picking up its read and skip counters
    pub fn run_source<R: Read>(&mut self, source: ChunkSource<R>) -> Result<()> {
        self.run_source_with(source, |_| {})
    }

    /// Like [`run_source`](Self::run_source), calling `on_batch` with the
    /// source counters after every batch
    pub fn run_source_with<R, F>(
        &mut self,
        mut source: ChunkSource<R>,
        mut on_batch: F,
    ) -> Result<()>
    where
        R: Read,
        F: FnMut(&IngestStats),
    {
        while let Some(batch) = source.next() {
            let result = batch.and_then(|batch| self.process_batch(batch));
            self.stats.merge_source(source.stats());
            result?;
            on_batch(&self.stats);
        }
        self.stats.merge_source(source.stats());
        Ok(())
    }

    /// Finalize every table and return them in declaration order.
    ///
    /// Tables are independent, so with the `parallel` feature their global
    /// merges run concurrently.
    pub fn finish(mut self) -> Result<StarSchema> {
        #[cfg(feature = "parallel")]
        let tables = self
            .accumulators
            .par_iter_mut()
            .map(Accumulator::finalize)
            .collect::<Result<Vec<_>>>()?;

        #[cfg(not(feature = "parallel"))]
        let tables = self
            .accumulators
            .iter_mut()
            .map(Accumulator::finalize)
            .collect::<Result<Vec<_>>>()?;

        self.stats.duration = self.started.elapsed();

        if self.stats.records_skipped > 0 {
            tracing::warn!(
                "Skipped {} malformed rows out of {}",
                self.stats.records_skipped,
                self.stats.records_read + self.stats.records_skipped
            );
        }
        for table in &tables {
            tracing::info!("Table '{}': {} records", table.name(), table.len());
        }

        Ok(StarSchema {
            tables,
            stats: self.stats,
        })
    }
}

/// Decompose a delimited file with the schema and source options of `config`
pub fn decompose_file(config: &PipelineConfig, path: impl AsRef<Path>) -> Result<StarSchema> {
    let schema = config.schema();
    let source = ChunkSource::open(path, &schema, &config.source)?;
    let mut pipeline = StarPipeline::new(&schema)?;
    pipeline.run_source(source)?;
    pipeline.finish()
}

/// Run a full decomposition over in-memory batches
pub fn decompose<I>(schema: &StarSchemaSpec, batches: I) -> Result<StarSchema>
where
    I: IntoIterator<Item = Result<Batch>>,
{
    let mut pipeline = StarPipeline::new(schema)?;
    pipeline.run(batches)?;
    pipeline.finish()
}
