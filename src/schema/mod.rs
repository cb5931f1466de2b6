//! Star schema definition
//!
//! A [`StarSchemaSpec`] is the fixed configuration the pipeline runs against:
//! the target table specs (which fields go to which table, and each table's
//! key) plus the declared type of every source field. Nothing here is
//! inferred from the data.

pub mod naming;
pub mod spec;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::ColumnType;
use crate::validation::{SpecValidationError, SpecValidator};

pub use naming::prettify_column_name;
pub use spec::{TableRole, TargetTableSpec};

/// Target table specs and source column types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSchemaSpec {
    /// Target tables, in output order
    pub tables: Vec<TargetTableSpec>,
    /// Declared type per source field; undeclared fields are text
    #[serde(default)]
    pub column_types: BTreeMap<String, ColumnType>,
}

impl StarSchemaSpec {
    pub fn new(tables: Vec<TargetTableSpec>, column_types: BTreeMap<String, ColumnType>) -> Self {
        Self {
            tables,
            column_types,
        }
    }

    /// Every source field used by some table, in first-use order
    pub fn source_fields(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.tables
            .iter()
            .flat_map(|t| t.columns.iter())
            .filter(|c| seen.insert(c.as_str()))
            .cloned()
            .collect()
    }

    pub fn column_type(&self, field: &str) -> ColumnType {
        self.column_types.get(field).copied().unwrap_or_default()
    }

    pub fn table(&self, name: &str) -> Option<&TargetTableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn validate(&self) -> Result<(), SpecValidationError> {
        SpecValidator::new().validate(&self.tables)
    }

    /// The six-table decomposition of the Iowa liquor sales export:
    /// one `transaction` fact table and the `store`, `county`, `category`,
    /// `vendor` and `item` dimensions.
    pub fn iowa_liquor_sales() -> Self {
        let tables = vec![
            TargetTableSpec::fact(
                "transaction",
                [
                    "Invoice/Item Number",
                    "Date",
                    "Store Number",
                    "Category",
                    "Vendor Number",
                    "Item Number",
                    "Bottles Sold",
                ],
                "Invoice/Item Number",
            ),
            TargetTableSpec::dimension(
                "store",
                ["Store Number", "Address", "City", "Zip Code", "County Number"],
                "Store Number",
            ),
            TargetTableSpec::dimension("county", ["County Number", "County"], "County Number"),
            TargetTableSpec::dimension("category", ["Category", "Category Name"], "Category"),
            TargetTableSpec::dimension("vendor", ["Vendor Number", "Vendor Name"], "Vendor Number"),
            TargetTableSpec::dimension(
                "item",
                [
                    "Item Number",
                    "Item Description",
                    "Pack",
                    "Bottle Volume (ml)",
                    "State Bottle Cost",
                    "State Bottle Retail",
                ],
                "Item Number",
            ),
        ];
        Self::new(tables, iowa_column_types())
    }
}

impl Default for StarSchemaSpec {
    fn default() -> Self {
        Self::iowa_liquor_sales()
    }
}

/// Source column types for the Iowa liquor sales export.
///
/// Identifier columns are floats because the export writes them with a
/// fractional part in places; prices stay text since they carry a `$` prefix.
pub fn iowa_column_types() -> BTreeMap<String, ColumnType> {
    [
        ("Invoice/Item Number", ColumnType::Text),
        ("Date", ColumnType::Date),
        ("Store Number", ColumnType::Float),
        ("Address", ColumnType::Text),
        ("City", ColumnType::Text),
        ("Zip Code", ColumnType::Text),
        ("County Number", ColumnType::Float),
        ("County", ColumnType::Text),
        ("Category", ColumnType::Float),
        ("Category Name", ColumnType::Text),
        ("Vendor Number", ColumnType::Float),
        ("Vendor Name", ColumnType::Text),
        ("Item Number", ColumnType::Float),
        ("Item Description", ColumnType::Text),
        ("Pack", ColumnType::Integer),
        ("Bottle Volume (ml)", ColumnType::Float),
        ("State Bottle Cost", ColumnType::Text),
        ("State Bottle Retail", ColumnType::Text),
        ("Bottles Sold", ColumnType::Integer),
    ]
    .into_iter()
    .map(|(name, ty)| (name.to_string(), ty))
    .collect()
}
