//! Target table specs

use serde::{Deserialize, Serialize};

/// Role of a target table in the star schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableRole {
    /// Transactional events referencing dimensions by key
    Fact,
    /// Descriptive attributes keyed by an identifier
    #[default]
    Dimension,
}

impl std::fmt::Display for TableRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableRole::Fact => write!(f, "fact"),
            TableRole::Dimension => write!(f, "dimension"),
        }
    }
}

/// Static description of one target table
///
/// Lists the source fields projected into the table, in output order, and the
/// field the table is deduplicated on. The key must be one of the projected
/// fields; [`crate::validation::SpecValidator`] enforces this before a
/// pipeline is built.
///
/// # Example
///
/// ```rust
/// use star_schema::schema::TargetTableSpec;
///
/// let spec = TargetTableSpec::dimension("vendor", ["Vendor Number", "Vendor Name"], "Vendor Number");
/// assert_eq!(spec.key_index(), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetTableSpec {
    /// Table name, also used for output file names
    pub name: String,
    /// Source field names to project, in output order
    pub columns: Vec<String>,
    /// Field the table is deduplicated on
    pub key: String,
    #[serde(default)]
    pub role: TableRole,
}

impl TargetTableSpec {
    pub fn new<I, S>(
        name: impl Into<String>,
        columns: I,
        key: impl Into<String>,
        role: TableRole,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            key: key.into(),
            role,
        }
    }

    pub fn fact<I, S>(name: impl Into<String>, columns: I, key: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, columns, key, TableRole::Fact)
    }

    pub fn dimension<I, S>(name: impl Into<String>, columns: I, key: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, columns, key, TableRole::Dimension)
    }

    /// Position of the key within the projected columns
    pub fn key_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c == &self.key)
    }

    pub fn is_fact(&self) -> bool {
        self.role == TableRole::Fact
    }
}
