//! First-seen-wins deduplication
//!
//! One primitive serves both stages: the per-chunk pass that bounds memory
//! while streaming, and the global pass over the concatenated chunks.

use std::collections::HashSet;
use std::sync::Arc;

use crate::models::{ProjectedBatch, Record};

/// Keep the first record for each distinct key, preserving input order.
///
/// Keys compare by exact [`Value`](crate::models::Value) equality, so every
/// record with a missing key collapses into a single record. Later duplicates
/// are dropped even when their other fields differ.
pub fn dedup_first_seen<I>(records: I, key_index: usize) -> Vec<Record>
where
    I: IntoIterator<Item = Record>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.value_at(key_index).clone()))
        .collect()
}

/// Per-chunk pass: dedup one projected sub-batch on its own key
pub fn dedup_batch(batch: ProjectedBatch) -> ProjectedBatch {
    let key_index = batch.key_index();
    let before = batch.len();
    let table = batch.table().to_string();
    let chunk = batch.chunk_index();
    let fields = Arc::clone(batch.fields());

    let deduped = dedup_first_seen(batch.into_records(), key_index);
    tracing::trace!(
        "Chunk {} of '{}': {} -> {} records",
        chunk,
        table,
        before,
        deduped.len()
    );

    ProjectedBatch::new(table, chunk, fields, key_index, deduped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;

    fn stores(rows: Vec<(Value, &str)>) -> Vec<Record> {
        let fields: Arc<[String]> = vec!["Store Number".to_string(), "City".to_string()].into();
        rows.into_iter()
            .map(|(k, c)| Record::new(Arc::clone(&fields), vec![k, c.into()]))
            .collect()
    }

    fn cities(records: &[Record]) -> Vec<String> {
        records.iter().map(|r| r.value_at(1).to_string()).collect()
    }

    #[test]
    fn test_first_occurrence_wins() {
        let records = stores(vec![
            (Value::Float(1.0), "Ames"),
            (Value::Float(2.0), "Perry"),
            (Value::Float(1.0), "Amess-typo"),
            (Value::Float(3.0), "Adel"),
            (Value::Float(2.0), "Perry"),
        ]);
        let deduped = dedup_first_seen(records, 0);
        assert_eq!(cities(&deduped), vec!["Ames", "Perry", "Adel"]);
    }

    #[test]
    fn test_missing_keys_collapse_to_one() {
        let records = stores(vec![
            (Value::Missing, "first"),
            (Value::Float(1.0), "Ames"),
            (Value::Missing, "second"),
            (Value::Missing, "third"),
        ]);
        let deduped = dedup_first_seen(records, 0);
        assert_eq!(cities(&deduped), vec!["first", "Ames"]);
    }

    #[test]
    fn test_dedup_batch_keeps_identity() {
        let fields: Arc<[String]> = vec!["Store Number".to_string(), "City".to_string()].into();
        let batch = ProjectedBatch::new(
            "store",
            4,
            Arc::clone(&fields),
            0,
            stores(vec![(Value::Float(1.0), "Ames"), (Value::Float(1.0), "Ames")]),
        );
        let deduped = dedup_batch(batch);
        assert_eq!(deduped.table(), "store");
        assert_eq!(deduped.chunk_index(), 4);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped.fields(), &fields);
    }
}
