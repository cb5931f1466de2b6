//! Schema router: split a batch into per-table projections

use std::sync::Arc;

use crate::models::{Batch, ProjectedBatch, Record, Value};
use crate::schema::TargetTableSpec;

/// A target table's projection, resolved once from its table definition
#[derive(Debug, Clone)]
struct Route {
    table: String,
    fields: Arc<[String]>,
    key_index: usize,
}

/// Projects batches onto every target table spec.
///
/// Routing is pure: the same batch and specs always give the same
/// sub-batches. Fields a record does not carry are projected as
/// [`Value::Missing`]; key emptiness is left to the deduplicator.
#[derive(Debug, Clone)]
pub struct SchemaRouter {
    routes: Vec<Route>,
}

impl SchemaRouter {
    /// Build a router from validated specs.
    ///
    /// Specs whose key is not projected are routed with the key at position 0;
    /// callers are expected to validate specs first.
    pub fn new(specs: &[TargetTableSpec]) -> Self {
        let routes = specs
            .iter()
            .map(|spec| Route {
                table: spec.name.clone(),
                fields: spec.columns.iter().cloned().collect(),
                key_index: spec.key_index().unwrap_or(0),
            })
            .collect();
        Self { routes }
    }

    /// One projected sub-batch per table, in declaration order
    pub fn route(&self, batch: &Batch) -> Vec<ProjectedBatch> {
        self.routes
            .iter()
            .map(|route| project(batch, route))
            .collect()
    }
}

fn project(batch: &Batch, route: &Route) -> ProjectedBatch {
    let indices: Vec<Option<usize>> = route
        .fields
        .iter()
        .map(|field| batch.field_index(field))
        .collect();

    let records = batch
        .records()
        .iter()
        .map(|record| {
            let values = indices
                .iter()
                .map(|index| match index {
                    Some(i) => record.value_at(*i).clone(),
                    None => Value::Missing,
                })
                .collect();
            Record::new(Arc::clone(&route.fields), values)
        })
        .collect();

    ProjectedBatch::new(
        route.table.clone(),
        batch.index(),
        Arc::clone(&route.fields),
        route.key_index,
        records,
    )
}
