//! Per-table accumulation of deduplicated sub-batches

use std::sync::Arc;

use crate::error::{Result, StarError};
use crate::models::{ProjectedBatch, Table};
use crate::schema::TargetTableSpec;
use crate::validation::SpecValidationError;

use super::merger::merge;

/// Lifecycle of one target table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorState {
    /// No batch processed yet
    Empty,
    /// At least one batch appended
    Accumulating,
    /// Drained for the global merge; accepts nothing further
    Finalized,
}

/// Collects the deduplicated sub-batches of one target table.
///
/// No cross-chunk deduplication happens here, so memory while streaming stays
/// proportional to the chunks seen so far times their per-chunk cardinality.
/// The global pass runs once, in [`Accumulator::finalize`].
#[derive(Debug)]
pub struct Accumulator {
    table: String,
    fields: Arc<[String]>,
    key_index: usize,
    chunks: Vec<ProjectedBatch>,
    record_count: usize,
    state: AccumulatorState,
}

impl Accumulator {
    /// Create an empty accumulator for a target table
    pub fn new(spec: &TargetTableSpec) -> Result<Self> {
        let key_index = spec
            .key_index()
            .ok_or_else(|| SpecValidationError::KeyNotProjected {
                table: spec.name.clone(),
                key: spec.key.clone(),
            })?;
        Ok(Self {
            table: spec.name.clone(),
            fields: spec.columns.iter().cloned().collect(),
            key_index,
            chunks: Vec::new(),
            record_count: 0,
            state: AccumulatorState::Empty,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn state(&self) -> AccumulatorState {
        self.state
    }

    /// Number of non-empty sub-batches held
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Records held across all sub-batches (before the global pass)
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Append one deduplicated sub-batch.
    ///
    /// Fails with [`StarError::LateAppend`] once the table is finalized and
    /// with [`StarError::SchemaMismatch`] when the sub-batch was projected for
    /// a different column layout.
    pub fn append(&mut self, batch: ProjectedBatch) -> Result<()> {
        if self.state == AccumulatorState::Finalized {
            return Err(StarError::LateAppend {
                table: self.table.clone(),
            });
        }
        if batch.fields() != &self.fields || batch.key_index() != self.key_index {
            return Err(StarError::SchemaMismatch {
                table: self.table.clone(),
            });
        }

        self.state = AccumulatorState::Accumulating;
        if !batch.is_empty() {
            self.record_count += batch.len();
            self.chunks.push(batch);
        }
        Ok(())
    }

    /// Hand over every sub-batch in accumulation order and move to `Finalized`
    pub fn drain(&mut self) -> Result<Vec<ProjectedBatch>> {
        if self.state == AccumulatorState::Finalized {
            return Err(StarError::AlreadyFinalized {
                table: self.table.clone(),
            });
        }
        self.state = AccumulatorState::Finalized;
        self.record_count = 0;
        Ok(std::mem::take(&mut self.chunks))
    }

    /// Drain and run the global merge, producing the finalized table
    pub fn finalize(&mut self) -> Result<Table> {
        let chunks = self.drain()?;
        Ok(merge(
            &self.table,
            Arc::clone(&self.fields),
            self.key_index,
            chunks,
        ))
    }
}
