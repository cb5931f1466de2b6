//! In-memory sink

use super::{ExportError, TableSink};
use crate::models::Table;

/// Keeps copies of written tables, in write order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    tables: Vec<Table>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    pub fn into_tables(self) -> Vec<Table> {
        self.tables
    }
}

impl TableSink for MemorySink {
    fn write_table(&mut self, table: &Table) -> Result<(), ExportError> {
        if self.table(table.name()).is_some() {
            return Err(ExportError::ExportError(format!(
                "Table '{}' was already written",
                table.name()
            )));
        }
        self.tables.push(table.clone());
        Ok(())
    }
}
