//! Global merge of accumulated sub-batches

use std::sync::Arc;

use crate::models::{ProjectedBatch, Table};

use super::dedup::dedup_first_seen;

/// Concatenate sub-batches in accumulation order and dedup across them.
///
/// Same first-seen-wins semantics as the per-chunk pass, applied over the full
/// concatenation, so a key that reappears in a later chunk keeps the record of
/// its first chunk. The result never holds more records than the table's
/// distinct key count.
pub fn merge(
    table: &str,
    fields: Arc<[String]>,
    key_index: usize,
    chunks: Vec<ProjectedBatch>,
) -> Table {
    let chunk_count = chunks.len();
    let records = dedup_first_seen(
        chunks.into_iter().flat_map(ProjectedBatch::into_records),
        key_index,
    );
    tracing::debug!(
        "Merged {} chunks of '{}' into {} records",
        chunk_count,
        table,
        records.len()
    );
    Table::new(table, fields, key_index, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Record, Value};

    fn chunk(fields: &Arc<[String]>, index: usize, rows: Vec<(&str, &str)>) -> ProjectedBatch {
        let records = rows
            .into_iter()
            .map(|(k, c)| Record::new(Arc::clone(fields), vec![k.into(), c.into()]))
            .collect();
        ProjectedBatch::new("store", index, Arc::clone(fields), 0, records)
    }

    #[test]
    fn test_first_chunk_wins_across_boundaries() {
        let fields: Arc<[String]> = vec!["key".to_string(), "city".to_string()].into();
        let chunks = vec![
            chunk(&fields, 0, vec![("A", "Ames"), ("B", "Perry")]),
            chunk(&fields, 1, vec![("A", "Amess-typo")]),
        ];
        let table = merge("store", Arc::clone(&fields), 0, chunks);

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(&Value::from("A")).unwrap().get("city"),
            Some(&Value::from("Ames"))
        );
        assert_eq!(
            table.get(&Value::from("B")).unwrap().get("city"),
            Some(&Value::from("Perry"))
        );
    }

    #[test]
    fn test_relative_order_is_preserved() {
        let fields: Arc<[String]> = vec!["key".to_string(), "city".to_string()].into();
        let chunks = vec![
            chunk(&fields, 0, vec![("C", "Adel"), ("A", "Ames")]),
            chunk(&fields, 1, vec![("B", "Perry"), ("C", "Boone")]),
        ];
        let table = merge("store", Arc::clone(&fields), 0, chunks);
        let keys: Vec<String> = table.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_empty_merge() {
        let fields: Arc<[String]> = vec!["key".to_string()].into();
        let table = merge("store", fields, 0, Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.columns(), &["key".to_string()]);
    }
}
